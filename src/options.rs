//! Book options: the input contract of a build.
//!
//! Options are plain data with builder-style setters, and deserialize from
//! a camelCase document (JSON, TOML, ...) in the same shape:
//!
//! ```
//! use epub_gen::{BookOptions, ChapterInput, EpubVersion};
//!
//! let options = BookOptions::new("Alice's Adventures in Wonderland")
//!     .with_author("Lewis Carroll")
//!     .with_version(EpubVersion::V2)
//!     .with_output("alice.epub")
//!     .with_chapter(ChapterInput::new("<p>Alice was beginning to get very tired</p>")
//!         .with_title("Down the Rabbit-Hole"));
//!
//! assert_eq!(options.content.len(), 1);
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::{Error, Result};

/// EPUB format version of the generated book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum EpubVersion {
    /// EPUB 2.0.1 with XHTML 1.1 content documents.
    V2,
    /// EPUB 3 with HTML5-flavored XHTML content documents.
    #[default]
    V3,
}

impl EpubVersion {
    /// The major version number (2 or 3).
    pub fn number(self) -> u8 {
        match self {
            EpubVersion::V2 => 2,
            EpubVersion::V3 => 3,
        }
    }
}

impl TryFrom<u8> for EpubVersion {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            2 => Ok(EpubVersion::V2),
            3 => Ok(EpubVersion::V3),
            other => Err(format!("unsupported EPUB version {other}, expected 2 or 3")),
        }
    }
}

/// An author field: one name, a list of names, or anything else (ignored).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    One(String),
    Many(Vec<String>),
    Other(IgnoredAny),
}

impl Authors {
    /// Normalize into an ordered list of names.
    ///
    /// A single string becomes a one-element list, a list passes through
    /// unchanged, any other value becomes an empty list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Authors::One(name) => vec![name],
            Authors::Many(names) => names,
            Authors::Other(_) => Vec::new(),
        }
    }
}

impl From<&str> for Authors {
    fn from(name: &str) -> Self {
        Authors::One(name.to_string())
    }
}

impl From<String> for Authors {
    fn from(name: String) -> Self {
        Authors::One(name)
    }
}

impl From<Vec<String>> for Authors {
    fn from(names: Vec<String>) -> Self {
        Authors::Many(names)
    }
}

impl From<Vec<&str>> for Authors {
    fn from(names: Vec<&str>) -> Self {
        Authors::Many(names.into_iter().map(str::to_string).collect())
    }
}

/// One chapter as supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChapterInput {
    pub title: Option<String>,
    pub author: Option<Authors>,
    /// Raw HTML for the chapter body.
    pub data: String,
    pub exclude_from_toc: Option<bool>,
    pub before_toc: Option<bool>,
    /// Explicit output file name; `.xhtml` is appended when missing.
    pub filename: Option<String>,
    /// Source URL, rendered as a link under the chapter title.
    pub url: Option<String>,
}

impl ChapterInput {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<Authors>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn exclude_from_toc(mut self, exclude: bool) -> Self {
        self.exclude_from_toc = Some(exclude);
        self
    }

    pub fn before_toc(mut self, before: bool) -> Self {
        self.before_toc = Some(before);
        self
    }
}

/// Options for building one book.
///
/// `title`, `content` and `output` are required; everything else has a
/// default applied when the build context is derived.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookOptions {
    pub title: Option<String>,
    pub author: Option<Authors>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    /// Cover image URL or local path.
    pub cover: Option<String>,
    /// Destination of the finished archive.
    pub output: Option<PathBuf>,
    pub version: EpubVersion,
    /// Stylesheet text replacing the bundled default.
    pub css: Option<String>,
    /// Font files to embed under `OEBPS/fonts`.
    pub fonts: Vec<PathBuf>,
    pub lang: Option<String>,
    pub toc_title: Option<String>,
    /// Publication date; defaults to the build time.
    pub date: Option<String>,
    /// Emit each chapter title as an `<h1>` in its document. Defaults to true.
    pub append_chapter_titles: Option<bool>,
    pub custom_opf_template_path: Option<PathBuf>,
    pub custom_ncx_toc_template_path: Option<PathBuf>,
    pub custom_html_toc_template_path: Option<PathBuf>,
    pub content: Vec<ChapterInput>,
    pub keywords: Vec<String>,
    pub source: Option<String>,
    /// Skip sanitization; the caller asserts chapter data is valid XHTML.
    pub trust_content: bool,
    /// Parent directory for the staging tree.
    pub temp_dir: Option<PathBuf>,
}

impl BookOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<Authors>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_version(mut self, version: EpubVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.fonts.push(path.into());
        self
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_toc_title(mut self, toc_title: impl Into<String>) -> Self {
        self.toc_title = Some(toc_title.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn append_chapter_titles(mut self, append: bool) -> Self {
        self.append_chapter_titles = Some(append);
        self
    }

    pub fn with_opf_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_opf_template_path = Some(path.into());
        self
    }

    pub fn with_ncx_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_ncx_toc_template_path = Some(path.into());
        self
    }

    pub fn with_html_toc_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_html_toc_template_path = Some(path.into());
        self
    }

    pub fn with_chapter(mut self, chapter: ChapterInput) -> Self {
        self.content.push(chapter);
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn trust_content(mut self, trust: bool) -> Self {
        self.trust_content = trust;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Check the required fields.
    ///
    /// Runs before any resource is allocated, so a failing build leaves
    /// nothing behind on disk.
    pub fn validate(&self) -> Result<()> {
        if self.output.as_ref().is_none_or(|p| p.as_os_str().is_empty()) {
            return Err(Error::Config("no output path".into()));
        }
        let has_title = self.title.as_ref().is_some_and(|t| !t.is_empty());
        if !has_title || self.content.is_empty() {
            return Err(Error::Config(
                "title and content are both required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authors_normalization() {
        assert_eq!(Authors::from("A").into_vec(), vec!["A"]);
        assert_eq!(Authors::from(vec!["A", "B"]).into_vec(), vec!["A", "B"]);
        assert!(Authors::Other(IgnoredAny).into_vec().is_empty());
    }

    #[test]
    fn test_version_try_from() {
        assert_eq!(EpubVersion::try_from(2), Ok(EpubVersion::V2));
        assert_eq!(EpubVersion::try_from(3), Ok(EpubVersion::V3));
        assert!(EpubVersion::try_from(4).is_err());
        assert_eq!(EpubVersion::default(), EpubVersion::V3);
    }

    #[test]
    fn test_validate_requires_output_first() {
        let err = BookOptions::default().validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("output")));
    }

    #[test]
    fn test_validate_requires_title_and_content() {
        let no_content = BookOptions::new("T").with_output("book.epub");
        assert!(matches!(no_content.validate(), Err(Error::Config(_))));

        let no_title = BookOptions::default()
            .with_output("book.epub")
            .with_chapter(ChapterInput::new("<p>x</p>"));
        assert!(matches!(no_title.validate(), Err(Error::Config(_))));

        let ok = BookOptions::new("T")
            .with_output("book.epub")
            .with_chapter(ChapterInput::new("<p>x</p>"));
        assert!(ok.validate().is_ok());
    }
}
