//! XHTML serialization for ArenaDom.
//!
//! Output is well-formed XML: void elements are written self-closing
//! (`<br/>`, `<img .../>`), text and attribute values are escaped, and
//! foreign subtrees (SVG, MathML) get their namespace declared on the
//! element where they start.

use html5ever::{Namespace, ns};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};
use crate::util::{escape_text, escape_xml};

/// HTML elements that never have content and must be written self-closing.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Check if a tag is an HTML void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Serialize the children of `parent` (not `parent` itself) as XHTML.
pub fn serialize_children(dom: &ArenaDom, parent: ArenaNodeId) -> String {
    let mut out = String::new();
    let parent_ns = dom
        .element_namespace(parent)
        .cloned()
        .unwrap_or(ns!(html));
    for child in dom.children(parent) {
        write_node(dom, child, &parent_ns, &mut out);
    }
    out
}

fn write_node(dom: &ArenaDom, id: ArenaNodeId, parent_ns: &Namespace, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        ArenaNodeData::Text(text) => out.push_str(&escape_text(text)),
        ArenaNodeData::Comment(text) => {
            if !text.is_empty() {
                out.push_str("<!--");
                out.push_str(&text.replace("--", "- -"));
                out.push_str("-->");
            }
        }
        // Doctypes have no place inside a body.
        ArenaNodeData::Doctype { .. } => {}
        ArenaNodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, parent_ns, out);
            }
        }
        ArenaNodeData::Element { name, attrs } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);

            let declares_ns = attrs.iter().any(|a| a.name.local.as_ref() == "xmlns");
            if name.ns != *parent_ns
                && !declares_ns
                && let Some(uri) = namespace_uri(&name.ns)
            {
                out.push_str(" xmlns=\"");
                out.push_str(uri);
                out.push('"');
            }

            for attr in attrs {
                out.push(' ');
                out.push_str(&attr.qualified_name());
                out.push_str("=\"");
                out.push_str(&escape_xml(&attr.value));
                out.push('"');
            }

            let has_children = node.first_child.is_some();
            let is_html = name.ns == ns!(html);
            if !has_children && (!is_html || is_void_element(tag)) {
                out.push_str("/>");
                return;
            }

            out.push('>');
            if !(is_html && is_void_element(tag)) {
                for child in dom.children(id) {
                    write_node(dom, child, &name.ns, out);
                }
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn namespace_uri(ns: &Namespace) -> Option<&'static str> {
    if *ns == ns!(svg) {
        Some("http://www.w3.org/2000/svg")
    } else if *ns == ns!(mathml) {
        Some("http://www.w3.org/1998/Math/MathML")
    } else if *ns == ns!(html) {
        Some("http://www.w3.org/1999/xhtml")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_body;

    fn roundtrip(html: &str) -> String {
        let (dom, root) = parse_body(html);
        serialize_children(&dom, root)
    }

    #[test]
    fn test_void_elements_self_close() {
        assert_eq!(
            roundtrip("<p>a<br>b<img src=\"x.png\"></p><hr>"),
            "<p>a<br/>b<img src=\"x.png\"/></p><hr/>"
        );
    }

    #[test]
    fn test_empty_non_void_keeps_close_tag() {
        assert_eq!(roundtrip("<div></div>"), "<div></div>");
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        assert_eq!(
            roundtrip("<p title='say \"hi\"'>a &amp; b &lt; c</p>"),
            "<p title=\"say &quot;hi&quot;\">a &amp; b &lt; c</p>"
        );
    }

    #[test]
    fn test_svg_gets_namespace() {
        let out = roundtrip("<svg><circle r=\"1\"></circle></svg>");
        assert_eq!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><circle r=\"1\"/></svg>"
        );
    }

    #[test]
    fn test_comment_double_dash_is_neutralized() {
        assert_eq!(roundtrip("<!-- a -- b -->"), "<!-- a - - b -->");
    }
}
