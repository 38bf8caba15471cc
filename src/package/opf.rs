//! Bundled OPF package document.

use chrono::Utc;

use crate::context::{BookContext, Chapter};
use crate::options::EpubVersion;
use crate::util::escape_xml;

/// Manifest id of the cover image.
pub const COVER_ID: &str = "image_cover";

pub fn render(book: &BookContext) -> String {
    let mut opf = String::new();

    match book.version {
        EpubVersion::V3 => opf.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId" xml:lang="{}">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
            escape_xml(&book.metadata.lang)
        )),
        EpubVersion::V2 => opf.push_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
        ),
    }

    opf.push_str(&metadata(book));
    opf.push_str("  </metadata>\n  <manifest>\n");
    opf.push_str(&manifest(book));
    opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");
    opf.push_str(&spine(book));
    opf.push_str("  </spine>\n");

    if book.version == EpubVersion::V2 {
        opf.push_str(&guide(book));
    }

    opf.push_str("</package>\n");
    opf
}

/// Dublin Core and `<meta>` entries.
pub fn metadata(book: &BookContext) -> String {
    let meta = &book.metadata;
    let mut out = String::new();

    out.push_str(&format!(
        "    <dc:identifier id=\"BookId\">urn:uuid:{}</dc:identifier>\n",
        book.id
    ));
    out.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape_xml(&meta.title)
    ));
    out.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape_xml(&meta.lang)
    ));
    out.push_str(&format!("    <dc:date>{}</dc:date>\n", escape_xml(&meta.date)));
    out.push_str(&format!(
        "    <dc:description>{}</dc:description>\n",
        escape_xml(&meta.description)
    ));

    for author in &meta.authors {
        out.push_str(&format!(
            "    <dc:creator>{}</dc:creator>\n",
            escape_xml(author)
        ));
    }

    out.push_str(&format!(
        "    <dc:publisher>{}</dc:publisher>\n",
        escape_xml(&meta.publisher)
    ));

    for keyword in &meta.keywords {
        out.push_str(&format!(
            "    <dc:subject>{}</dc:subject>\n",
            escape_xml(keyword)
        ));
    }

    if let Some(ref source) = meta.source {
        out.push_str(&format!("    <dc:source>{}</dc:source>\n", escape_xml(source)));
    }

    if book.version == EpubVersion::V3 {
        out.push_str(&format!(
            "    <meta property=\"dcterms:modified\">{}</meta>\n",
            Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
        ));
    }

    if book.cover.is_some() {
        out.push_str(&format!("    <meta name=\"cover\" content=\"{COVER_ID}\"/>\n"));
    }

    out
}

/// `<item>` entries for every file in the package.
pub fn manifest(book: &BookContext) -> String {
    let mut out = String::new();

    out.push_str(
        "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
    );
    match book.version {
        EpubVersion::V3 => out.push_str(
            "    <item id=\"toc\" href=\"toc.xhtml\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n",
        ),
        EpubVersion::V2 => out.push_str(
            "    <item id=\"toc\" href=\"toc.xhtml\" media-type=\"application/xhtml+xml\"/>\n",
        ),
    }
    out.push_str("    <item id=\"css\" href=\"style.css\" media-type=\"text/css\"/>\n");

    for (index, font) in book.fonts.iter().enumerate() {
        out.push_str(&format!(
            "    <item id=\"font_{}\" href=\"{}\" media-type=\"{}\"/>\n",
            index,
            escape_xml(&font.href()),
            font.media_type()
        ));
    }

    for chapter in &book.chapters {
        out.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
            chapter.id,
            escape_xml(&chapter.href)
        ));
    }

    if let Some(ref cover) = book.cover {
        let properties = match book.version {
            EpubVersion::V3 => " properties=\"cover-image\"",
            EpubVersion::V2 => "",
        };
        out.push_str(&format!(
            "    <item id=\"{COVER_ID}\" href=\"{}\" media-type=\"{}\"{properties}/>\n",
            cover.file_name(),
            cover.media_type()
        ));
    }

    for image in &book.images {
        out.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
            image.manifest_id(),
            image.href(),
            image.media_type
        ));
    }

    out
}

/// Reading order: chapters placed before the toc, the toc, then the rest.
pub fn spine(book: &BookContext) -> String {
    let itemref = |chapter: &Chapter| format!("    <itemref idref=\"{}\"/>\n", chapter.id);

    let mut out: String = book.chapters_before_toc().map(itemref).collect();
    out.push_str("    <itemref idref=\"toc\"/>\n");
    out.extend(book.chapters_after_toc().map(itemref));
    out
}

fn guide(book: &BookContext) -> String {
    let mut out = String::from("  <guide>\n");
    out.push_str(&format!(
        "    <reference type=\"toc\" title=\"{}\" href=\"toc.xhtml\"/>\n",
        escape_xml(&book.metadata.toc_title)
    ));
    if let Some(first) = book.chapters_after_toc().next() {
        out.push_str(&format!(
            "    <reference type=\"text\" title=\"{}\" href=\"{}\"/>\n",
            escape_xml(first.title.as_deref().unwrap_or("Start")),
            escape_xml(&first.href)
        ));
    }
    out.push_str("  </guide>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BookOptions, ChapterInput};

    fn book(version: EpubVersion) -> BookContext {
        let options = BookOptions::new("A & B")
            .with_author(vec!["Ann", "Bob"])
            .with_output("book.epub")
            .with_version(version)
            .with_cover("cover.png")
            .with_keyword("sea")
            .with_chapter(ChapterInput::new("<p>pre</p>").with_title("Preface").before_toc(true))
            .with_chapter(ChapterInput::new("<p>one <img src='a.gif'></p>").with_title("One"));
        BookContext::from_options(options).unwrap()
    }

    #[test]
    fn test_v3_package() {
        let ctx = book(EpubVersion::V3);
        let opf = render(&ctx);
        assert!(opf.contains("version=\"3.0\""));
        assert!(opf.contains(&format!("urn:uuid:{}", ctx.id)));
        assert!(opf.contains("<dc:title>A &amp; B</dc:title>"));
        assert!(opf.contains("<dc:creator>Ann</dc:creator>"));
        assert!(opf.contains("<dc:creator>Bob</dc:creator>"));
        assert!(opf.contains("<dc:subject>sea</dc:subject>"));
        assert!(opf.contains("dcterms:modified"));
        assert!(opf.contains("properties=\"nav\""));
        assert!(opf.contains(
            "<item id=\"image_cover\" href=\"cover.png\" media-type=\"image/png\" properties=\"cover-image\"/>"
        ));
        assert!(opf.contains("<meta name=\"cover\" content=\"image_cover\"/>"));
        let image = &ctx.images.as_slice()[0];
        assert!(opf.contains(&format!("href=\"{}\" media-type=\"image/gif\"", image.href())));
        assert!(!opf.contains("<guide>"));
    }

    #[test]
    fn test_spine_order() {
        let ctx = book(EpubVersion::V3);
        assert_eq!(
            spine(&ctx),
            "    <itemref idref=\"item_0\"/>\n    <itemref idref=\"toc\"/>\n    <itemref idref=\"item_1\"/>\n"
        );
    }

    #[test]
    fn test_v2_package_has_guide() {
        let opf = render(&book(EpubVersion::V2));
        assert!(opf.contains("version=\"2.0\""));
        assert!(!opf.contains("dcterms:modified"));
        assert!(!opf.contains("properties="));
        assert!(opf.contains("<guide>"));
        assert!(opf.contains("<reference type=\"text\" title=\"One\" href=\"1_one.xhtml\"/>"));
    }
}
