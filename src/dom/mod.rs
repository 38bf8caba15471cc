//! Arena DOM, html5ever parsing, and XHTML serialization.

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute};
pub use serialize::{is_void_element, serialize_children};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;

use tree_sink::ArenaSink;

/// Parse a full HTML document into an ArenaDom.
///
/// Scripting is off, so `<noscript>` content is parsed as elements rather
/// than raw text.
pub fn parse_html(html: &str) -> ArenaDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(ArenaSink::new(), opts)
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse a fragment of body content and return the DOM with its `<body>`.
///
/// The fragment is wrapped in a minimal document so that everything it
/// contains, including `<style>` or `<title>`, stays inside the body.
pub fn parse_body(fragment: &str) -> (ArenaDom, ArenaNodeId) {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{fragment}</body></html>");
    let dom = parse_html(&wrapped);
    let body = body_of(&dom);
    (dom, body)
}

/// The `<body>` element of a parsed document, or the document root when
/// the parser produced none.
pub fn body_of(dom: &ArenaDom) -> ArenaNodeId {
    dom.find_by_tag("body").unwrap_or_else(|| dom.document())
}
