//! Chapter content documents.

use crate::context::{BookContext, Chapter};
use crate::util::escape_xml;

/// Build the complete XHTML document for `chapter`.
///
/// The title heading, byline and source link are each emitted only when
/// the chapter has a title.
pub fn chapter_document(book: &BookContext, chapter: &Chapter) -> String {
    let title = chapter.title.as_deref().unwrap_or("");
    let mut doc = book.doc_header();

    doc.push_str("\n  <head>\n  <meta charset=\"UTF-8\" />\n  <title>");
    doc.push_str(&escape_xml(title));
    doc.push_str(
        "</title>\n  <link rel=\"stylesheet\" type=\"text/css\" href=\"style.css\" />\n  </head>\n<body>",
    );

    if !title.is_empty() {
        if book.append_chapter_titles {
            doc.push_str("<h1>");
            doc.push_str(&escape_xml(title));
            doc.push_str("</h1>");
        }
        if !chapter.authors.is_empty() {
            let authors: Vec<_> = chapter.authors.iter().map(|a| escape_xml(a)).collect();
            doc.push_str("<p class=\"epub-author\">");
            doc.push_str(&authors.join(", "));
            doc.push_str("</p>");
        }
        if let Some(ref url) = chapter.url {
            let url = escape_xml(url);
            doc.push_str(&format!(
                "<p class=\"epub-link\"><a href=\"{url}\">{url}</a></p>"
            ));
        }
    }

    doc.push_str(&chapter.content);
    doc.push_str("</body></html>");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BookOptions, ChapterInput};

    fn book(chapter: ChapterInput, append_titles: bool) -> BookContext {
        let options = BookOptions::new("Book")
            .with_output("book.epub")
            .append_chapter_titles(append_titles)
            .with_chapter(chapter);
        BookContext::from_options(options).unwrap()
    }

    #[test]
    fn test_full_chapter() {
        let ctx = book(
            ChapterInput::new("<p>body</p>")
                .with_title("Fish & Chips")
                .with_author(vec!["A", "B<C>"])
                .with_url("http://x.org/?q=1&r=2"),
            true,
        );
        let doc = chapter_document(&ctx, &ctx.chapters[0]);
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n"));
        assert!(doc.contains("<title>Fish &amp; Chips</title>"));
        assert!(doc.contains(
            "<body><h1>Fish &amp; Chips</h1><p class=\"epub-author\">A, B&lt;C&gt;</p><p class=\"epub-link\"><a href=\"http://x.org/?q=1&amp;r=2\">http://x.org/?q=1&amp;r=2</a></p><p>body</p></body></html>"
        ));
    }

    #[test]
    fn test_titles_can_be_suppressed() {
        let ctx = book(ChapterInput::new("<p>b</p>").with_title("T").with_author("A"), false);
        let doc = chapter_document(&ctx, &ctx.chapters[0]);
        assert!(!doc.contains("<h1>"));
        assert!(doc.contains("<body><p class=\"epub-author\">A</p><p>b</p></body>"));
    }

    #[test]
    fn test_untitled_chapter_has_no_byline() {
        let ctx = book(ChapterInput::new("<p>b</p>").with_author("A").with_url("http://x"), true);
        let doc = chapter_document(&ctx, &ctx.chapters[0]);
        assert!(doc.contains("<title></title>"));
        assert!(doc.contains("<body><p>b</p></body></html>"));
    }
}
