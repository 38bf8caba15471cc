//! Chapter HTML sanitization.
//!
//! Turns arbitrary chapter HTML into XHTML that is legal in the target
//! EPUB version:
//!
//! 1. Parse the fragment. If the input carries its own `<body>`, only the
//!    body's content is kept.
//! 2. Visit elements deepest-last-first. `img`, `br` and `hr` lose their
//!    children, `img` gets a placeholder `alt`, attributes outside the
//!    allow-list are dropped, and under EPUB 2 tags outside the XHTML 1.1
//!    list are demoted to `<div>`.
//! 3. Visit `img` elements in document order, give each a fresh id and
//!    point its `src` into `images/`.
//! 4. Serialize back to XHTML.
//!
//! Step 2 must run children before parents: demoting an element moves its
//! children under a new `<div>`, and the walk is computed up front.

mod allowlist;

pub use allowlist::{ALLOWED_ATTRIBUTES, XHTML11_TAGS, is_allowed_attribute, is_xhtml11_tag};

use std::path::Path;

use tracing::warn;

use crate::dom::{self, ArenaDom, ArenaNodeId, serialize_children};
use crate::images::ImageReference;
use crate::options::EpubVersion;

/// `alt` text given to images that have none.
pub const IMAGE_PLACEHOLDER_ALT: &str = "image-placeholder";

/// Output of sanitizing one chapter.
#[derive(Debug, Clone, Default)]
pub struct SanitizedChapter {
    /// XHTML body content.
    pub body: String,
    /// Images found in the chapter, in document order.
    pub images: Vec<ImageReference>,
}

/// Per-book sanitizer settings.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer {
    version: EpubVersion,
    trust_content: bool,
}

impl Sanitizer {
    pub fn new(version: EpubVersion) -> Self {
        Self {
            version,
            trust_content: false,
        }
    }

    /// Pass chapter data through untouched.
    ///
    /// The caller asserts the content is already valid XHTML for the
    /// target version; no attributes are stripped and no images are
    /// collected.
    pub fn trust_content(mut self, trust: bool) -> Self {
        self.trust_content = trust;
        self
    }

    /// Sanitize the chapter at `chapter_index` whose document will be
    /// written into `chapter_dir`.
    pub fn sanitize(&self, chapter_index: usize, raw: &str, chapter_dir: &Path) -> SanitizedChapter {
        if self.trust_content {
            return SanitizedChapter {
                body: raw.to_string(),
                images: Vec::new(),
            };
        }

        let (mut dom, body) = if has_body_tag(raw) {
            let dom = dom::parse_html(raw);
            let body = dom::body_of(&dom);
            (dom, body)
        } else {
            dom::parse_body(raw)
        };

        self.clean_elements(&mut dom, body, chapter_index);
        let images = rewrite_images(&mut dom, body, chapter_dir);

        SanitizedChapter {
            body: serialize_children(&dom, body),
            images,
        }
    }

    fn clean_elements(&self, dom: &mut ArenaDom, root: ArenaNodeId, chapter_index: usize) {
        for id in dom.descendant_elements(root).into_iter().rev() {
            let Some(tag) = dom.element_name(id).map(|n| n.to_string()) else {
                continue;
            };

            if matches!(tag.as_str(), "img" | "br" | "hr") {
                dom.clear_children(id);
                if tag == "img" && dom.get_attr(id, "alt").is_none() {
                    dom.set_attr(id, "alt", IMAGE_PLACEHOLDER_ALT);
                }
            }

            dom.retain_attrs(id, |attr| {
                let name = attr.qualified_name();
                is_allowed_attribute(&name) && (name != "type" || tag == "script")
            });

            if self.version == EpubVersion::V2 && !is_xhtml11_tag(&tag) {
                warn!(
                    chapter = chapter_index,
                    tag = %tag,
                    "tag isn't allowed on EPUB 2/XHTML 1.1 DTD, replacing with div"
                );
                let div = dom.create_html_element("div");
                dom.reparent_children(id, div);
                dom.replace(id, div);
            }
        }
    }
}

/// Rewrite every `img` under `root` to a fresh package-relative `src`.
///
/// Images without a `src` are left as they are and not collected.
fn rewrite_images(dom: &mut ArenaDom, root: ArenaNodeId, chapter_dir: &Path) -> Vec<ImageReference> {
    let mut images = Vec::new();
    for id in dom.descendant_elements(root) {
        if dom.element_name(id).is_none_or(|n| &**n != "img") {
            continue;
        }
        let Some(src) = dom.get_attr(id, "src").map(str::to_string) else {
            continue;
        };
        let image = ImageReference::new(src, chapter_dir);
        dom.set_attr(id, "src", &image.href());
        images.push(image);
    }
    images
}

/// Whether the raw input contains a `<body` start tag.
fn has_body_tag(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    memchr::memchr_iter(b'<', bytes).any(|pos| {
        let rest = &bytes[pos + 1..];
        rest.len() >= 4
            && rest[..4].eq_ignore_ascii_case(b"body")
            && rest
                .get(4)
                .is_none_or(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
    })
}

/// Sanitize with default settings for `version`.
pub fn sanitize_html(raw: &str, version: EpubVersion, chapter_dir: &Path) -> SanitizedChapter {
    Sanitizer::new(version).sanitize(0, raw, chapter_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str, version: EpubVersion) -> SanitizedChapter {
        sanitize_html(raw, version, Path::new("/book/OEBPS"))
    }

    #[test]
    fn test_has_body_tag() {
        assert!(has_body_tag("<html><BODY class=x>hi</BODY></html>"));
        assert!(has_body_tag("<body>"));
        assert!(!has_body_tag("<p>no body here</p>"));
        assert!(!has_body_tag("<bodyguard>x</bodyguard>"));
    }

    #[test]
    fn test_outer_document_is_discarded() {
        let out = clean(
            "<html><head><title>x</title></head><body><p>kept</p></body></html>",
            EpubVersion::V3,
        );
        assert_eq!(out.body, "<p>kept</p>");
    }

    #[test]
    fn test_disallowed_attributes_are_dropped() {
        let out = clean(
            "<p class=\"a\" data-x=\"1\" onclick=\"f()\" style=\"color:red\">t</p>",
            EpubVersion::V3,
        );
        assert_eq!(out.body, "<p class=\"a\" onclick=\"f()\" style=\"color:red\">t</p>");
    }

    #[test]
    fn test_type_kept_only_on_script() {
        let out = clean(
            "<script type=\"text/javascript\"></script><ol type=\"a\"><li>x</li></ol>",
            EpubVersion::V3,
        );
        assert_eq!(
            out.body,
            "<script type=\"text/javascript\"></script><ol><li>x</li></ol>"
        );
    }

    #[test]
    fn test_img_alt_default_and_existing() {
        let out = clean(
            "<img src=\"a.png\"><img src=\"b.gif\" alt=\"Figure\">",
            EpubVersion::V3,
        );
        assert_eq!(out.images.len(), 2);
        assert!(out.body.contains("alt=\"image-placeholder\""));
        assert!(out.body.contains("alt=\"Figure\""));
    }

    #[test]
    fn test_img_src_rewritten_and_cataloged() {
        let out = clean("<p>Hi <img src='http://x/y.png'></p>", EpubVersion::V3);
        assert_eq!(out.images.len(), 1);
        let image = &out.images[0];
        assert_eq!(image.url, "http://x/y.png");
        assert_eq!(image.extension, "png");
        assert_eq!(image.media_type, "image/png");
        assert_eq!(image.dir, Path::new("/book/OEBPS"));
        assert_eq!(
            out.body,
            format!("<p>Hi <img src=\"images/{}.png\" alt=\"image-placeholder\"/></p>", image.id)
        );
    }

    #[test]
    fn test_img_without_src_is_not_cataloged() {
        let out = clean("<img alt=\"x\">", EpubVersion::V3);
        assert!(out.images.is_empty());
        assert_eq!(out.body, "<img alt=\"x\"/>");
    }

    #[test]
    fn test_v2_demotes_disallowed_tags() {
        let out = clean(
            "<section id=\"s\"><p>a</p><figure><img src=\"f.jpg\"></figure></section>",
            EpubVersion::V2,
        );
        let id = &out.images[0].id;
        assert_eq!(
            out.body,
            format!(
                "<div><p>a</p><div><img src=\"images/{id}.jpeg\" alt=\"image-placeholder\"/></div></div>"
            )
        );
    }

    #[test]
    fn test_v3_keeps_html5_tags() {
        let out = clean("<section><p>a</p></section>", EpubVersion::V3);
        assert_eq!(out.body, "<section><p>a</p></section>");
    }

    #[test]
    fn test_trusted_content_passes_through() {
        let raw = "<p data-x='1'><img src='http://x/y.png'></p>";
        let out = Sanitizer::new(EpubVersion::V2)
            .trust_content(true)
            .sanitize(0, raw, Path::new("/book/OEBPS"));
        assert_eq!(out.body, raw);
        assert!(out.images.is_empty());
    }
}
