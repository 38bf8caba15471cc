//! Bundled NCX table of contents.

use super::nav::chapter_label;
use crate::context::BookContext;
use crate::util::escape_xml;

pub fn render(book: &BookContext) -> String {
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="urn:uuid:"#,
    );
    ncx.push_str(&book.id.to_string());
    ncx.push_str(
        r#""/>
    <meta name="dtb:generator" content="epub-gen"/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>"#,
    );
    ncx.push_str(&escape_xml(&book.metadata.title));
    ncx.push_str("</text>\n  </docTitle>\n  <docAuthor>\n    <text>");
    ncx.push_str(&escape_xml(&book.metadata.authors.join(", ")));
    ncx.push_str("</text>\n  </docAuthor>\n  <navMap>\n");
    ncx.push_str(&nav_points(book));
    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

/// `<navPoint>` entries: chapters before the toc, the toc, then the
/// rest. Chapters excluded from the toc are skipped.
pub fn nav_points(book: &BookContext) -> String {
    let mut out = String::new();
    let mut play_order = 1;

    let listed = |before: bool| {
        book.chapters
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.before_toc == before && !c.exclude_from_toc)
    };

    for (index, chapter) in listed(true) {
        let label = chapter_label(index, chapter);
        write_nav_point(&mut out, &chapter.id, &label, &chapter.href, &mut play_order);
    }
    let toc_title = &book.metadata.toc_title;
    write_nav_point(&mut out, "toc", toc_title, "toc.xhtml", &mut play_order);
    for (index, chapter) in listed(false) {
        let label = chapter_label(index, chapter);
        write_nav_point(&mut out, &chapter.id, &label, &chapter.href, &mut play_order);
    }

    out
}

fn write_nav_point(out: &mut String, id: &str, label: &str, href: &str, play_order: &mut usize) {
    out.push_str(&format!(
        "    <navPoint id=\"{}\" playOrder=\"{}\" class=\"chapter\">\n",
        escape_xml(id),
        play_order
    ));
    out.push_str(&format!(
        "      <navLabel>\n        <text>{}</text>\n      </navLabel>\n",
        escape_xml(label)
    ));
    out.push_str(&format!("      <content src=\"{}\"/>\n", escape_xml(href)));
    out.push_str("    </navPoint>\n");
    *play_order += 1;
}
