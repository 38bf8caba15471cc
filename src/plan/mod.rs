//! Chapter planning: ids, file names and output paths.
//!
//! Planning is pure: it assigns each chapter its position-derived id and
//! href, resolves where its document will be written under the package's
//! content directory, and normalizes the author list and TOC flags. It
//! never fails and touches no files.

mod slug;

pub use slug::{slugify, strip_diacritics};

use std::path::Path;

use crate::context::Chapter;
use crate::options::ChapterInput;

/// Title used to derive a file name for untitled chapters.
pub const PLACEHOLDER_TITLE: &str = "no title";

const XHTML_SUFFIX: &str = ".xhtml";

/// Derive the package-relative href of the chapter at `index`.
///
/// An explicit file name wins, with `.xhtml` appended unless already
/// present. Otherwise the href is `<index>_<slug>.xhtml`, the slug taken
/// from the title with diacritics removed.
pub fn chapter_href(index: usize, input: &ChapterInput) -> String {
    if let Some(filename) = &input.filename {
        if filename.ends_with(XHTML_SUFFIX) {
            return filename.clone();
        }
        return format!("{filename}{XHTML_SUFFIX}");
    }

    let title = input.title.as_deref().unwrap_or(PLACEHOLDER_TITLE);
    format!("{index}_{}{XHTML_SUFFIX}", slugify(&strip_diacritics(title)))
}

/// Plan every chapter in input order.
///
/// `content_dir` is the package's `OEBPS` directory. The returned
/// chapters still carry their raw data as `content`.
pub fn plan_chapters(inputs: Vec<ChapterInput>, content_dir: &Path) -> Vec<Chapter> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| plan_chapter(index, input, content_dir))
        .collect()
}

fn plan_chapter(index: usize, input: ChapterInput, content_dir: &Path) -> Chapter {
    let href = chapter_href(index, &input);
    let output_path = content_dir.join(&href);
    let directory = output_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| content_dir.to_path_buf());

    Chapter {
        id: format!("item_{index}"),
        href,
        output_path,
        directory,
        title: input.title,
        authors: input.author.map(|a| a.into_vec()).unwrap_or_default(),
        exclude_from_toc: input.exclude_from_toc.unwrap_or(false),
        before_toc: input.before_toc.unwrap_or(false),
        url: input.url,
        content: input.data,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;

    use proptest::prelude::*;

    use super::*;
    use crate::options::Authors;

    fn oebps() -> PathBuf {
        PathBuf::from("/tmp/book/OEBPS")
    }

    #[test]
    fn test_href_from_title() {
        let input = ChapterInput::new("").with_title("Ch1");
        assert_eq!(chapter_href(0, &input), "0_ch1.xhtml");
    }

    #[test]
    fn test_href_without_title_uses_placeholder() {
        assert_eq!(chapter_href(3, &ChapterInput::new("")), "3_no-title.xhtml");
    }

    #[test]
    fn test_href_from_filename() {
        let named = ChapterInput::new("").with_filename("intro");
        assert_eq!(chapter_href(0, &named), "intro.xhtml");

        let suffixed = ChapterInput::new("").with_filename("intro.xhtml");
        assert_eq!(chapter_href(0, &suffixed), "intro.xhtml");
    }

    #[test]
    fn test_plan_paths_and_defaults() {
        let chapters = plan_chapters(
            vec![
                ChapterInput::new("<p>a</p>").with_title("Déjà Vu"),
                ChapterInput::new("<p>b</p>").with_filename("notes/end"),
            ],
            &oebps(),
        );

        assert_eq!(chapters[0].id, "item_0");
        assert_eq!(chapters[0].href, "0_deja-vu.xhtml");
        assert_eq!(chapters[0].output_path, oebps().join("0_deja-vu.xhtml"));
        assert_eq!(chapters[0].directory, oebps());
        assert!(!chapters[0].exclude_from_toc);
        assert!(!chapters[0].before_toc);
        assert_eq!(chapters[0].content, "<p>a</p>");

        assert_eq!(chapters[1].id, "item_1");
        assert_eq!(chapters[1].directory, oebps().join("notes"));
    }

    #[test]
    fn test_author_normalization() {
        let chapters = plan_chapters(
            vec![
                ChapterInput::new("").with_author("Solo"),
                ChapterInput::new("").with_author(vec!["A", "B"]),
                ChapterInput::new(""),
                ChapterInput {
                    author: Some(Authors::Other(serde::de::IgnoredAny)),
                    ..ChapterInput::new("")
                },
            ],
            &oebps(),
        );

        assert_eq!(chapters[0].authors, vec!["Solo"]);
        assert_eq!(chapters[1].authors, vec!["A", "B"]);
        assert!(chapters[2].authors.is_empty());
        assert!(chapters[3].authors.is_empty());
    }

    proptest! {
        #[test]
        fn prop_generated_hrefs_are_unique(
            titles in prop::collection::vec(prop::option::of("[a-zA-Z ]{0,8}"), 1..24)
        ) {
            let inputs: Vec<ChapterInput> = titles
                .into_iter()
                .map(|title| ChapterInput { title, ..Default::default() })
                .collect();
            let count = inputs.len();
            let chapters = plan_chapters(inputs, &oebps());
            let hrefs: HashSet<_> = chapters.iter().map(|c| c.href.clone()).collect();
            prop_assert_eq!(hrefs.len(), count);
        }

        #[test]
        fn prop_filename_gets_single_suffix(name in "[a-z]{1,10}(\\.xhtml)?") {
            let href = chapter_href(0, &ChapterInput::new("").with_filename(name.clone()));
            prop_assert!(href.ends_with(".xhtml"));
            prop_assert!(!href.ends_with(".xhtml.xhtml"));
            prop_assert!(href.starts_with(name.trim_end_matches(".xhtml")));
        }
    }
}
