//! Bundled HTML table of contents (`toc.xhtml`).

use crate::context::{BookContext, Chapter};
use crate::options::EpubVersion;
use crate::util::escape_xml;

/// Label of the chapter at `index`: its title, or `Chapter <n>`.
pub fn chapter_label(index: usize, chapter: &Chapter) -> String {
    match chapter.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => format!("Chapter {}", index + 1),
    }
}

pub fn render(book: &BookContext) -> String {
    let lang = escape_xml(&book.metadata.lang);
    let title = escape_xml(&book.metadata.title);
    let toc_title = escape_xml(&book.metadata.toc_title);
    let items = toc_list(book);

    match book.version {
        EpubVersion::V3 => format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
  <title>{title}</title>
  <meta charset="UTF-8"/>
  <link rel="stylesheet" type="text/css" href="style.css"/>
</head>
<body>
<h1 class="h1">{toc_title}</h1>
<nav id="toc" epub:type="toc">
  <ol>
{items}  </ol>
</nav>
</body>
</html>
"#
        ),
        EpubVersion::V2 => format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
  <title>{title}</title>
  <meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/>
  <link rel="stylesheet" type="text/css" href="style.css"/>
</head>
<body>
<h1 class="h1">{toc_title}</h1>
<div id="toc">
  <ol>
{items}  </ol>
</div>
</body>
</html>
"#
        ),
    }
}

/// `<li>` entries for every chapter not excluded from the toc.
pub fn toc_list(book: &BookContext) -> String {
    let mut out = String::new();
    for (index, chapter) in book.chapters.iter().enumerate() {
        if chapter.exclude_from_toc {
            continue;
        }
        out.push_str("    <li class=\"table-of-content\"><a href=\"");
        out.push_str(&escape_xml(&chapter.href));
        out.push_str("\">");
        out.push_str(&escape_xml(&chapter_label(index, chapter)));
        if !chapter.authors.is_empty() {
            out.push_str(" - <small class=\"toc-author\">");
            out.push_str(&escape_xml(&chapter.authors.join(", ")));
            out.push_str("</small>");
        }
        if let Some(ref url) = chapter.url {
            out.push_str("<span class=\"toc-link\">");
            out.push_str(&escape_xml(url));
            out.push_str("</span>");
        }
        out.push_str("</a></li>\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BookOptions, ChapterInput};

    fn book(version: EpubVersion) -> BookContext {
        let options = BookOptions::new("Book")
            .with_output("book.epub")
            .with_version(version)
            .with_chapter(
                ChapterInput::new("x")
                    .with_title("Intro")
                    .with_author("Ann")
                    .with_url("http://example.com/?a=1&b=2"),
            )
            .with_chapter(ChapterInput::new("x").exclude_from_toc(true))
            .with_chapter(ChapterInput::new("x"));
        BookContext::from_options(options).unwrap()
    }

    #[test]
    fn test_toc_list() {
        let list = toc_list(&book(EpubVersion::V3));
        assert_eq!(list.matches("<li").count(), 2);
        assert!(list.contains(
            "<a href=\"0_intro.xhtml\">Intro - <small class=\"toc-author\">Ann</small><span class=\"toc-link\">http://example.com/?a=1&amp;b=2</span></a>"
        ));
        assert!(list.contains(">Chapter 3</a>"));
    }

    #[test]
    fn test_versions() {
        let v3 = render(&book(EpubVersion::V3));
        assert!(v3.contains("<nav id=\"toc\" epub:type=\"toc\">"));
        assert!(v3.contains("<h1 class=\"h1\">Table Of Contents</h1>"));

        let v2 = render(&book(EpubVersion::V2));
        assert!(v2.contains("XHTML 1.1"));
        assert!(!v2.contains("<nav"));
    }
}
