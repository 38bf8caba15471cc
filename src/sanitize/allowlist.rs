//! Fixed allow-lists for chapter attributes and EPUB 2 tags.

/// Attributes kept on any element. Everything else is dropped.
///
/// Names are matched against the qualified name, so `xml:lang` matches
/// only the prefixed attribute.
pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "about",
    "accesskey",
    "alt",
    "aria-activedescendant",
    "aria-atomic",
    "aria-autocomplete",
    "aria-busy",
    "aria-checked",
    "aria-controls",
    "aria-describedat",
    "aria-describedby",
    "aria-disabled",
    "aria-dropeffect",
    "aria-expanded",
    "aria-flowto",
    "aria-grabbed",
    "aria-haspopup",
    "aria-hidden",
    "aria-invalid",
    "aria-label",
    "aria-labelledby",
    "aria-level",
    "aria-live",
    "aria-multiline",
    "aria-multiselectable",
    "aria-orientation",
    "aria-owns",
    "aria-posinset",
    "aria-pressed",
    "aria-readonly",
    "aria-relevant",
    "aria-required",
    "aria-selected",
    "aria-setsize",
    "aria-sort",
    "aria-valuemax",
    "aria-valuemin",
    "aria-valuenow",
    "aria-valuetext",
    "class",
    "colspan",
    "content",
    "contenteditable",
    "contextmenu",
    "datatype",
    "dir",
    "draggable",
    "dropzone",
    "height",
    "hidden",
    "href",
    "hreflang",
    "id",
    "inlist",
    "itemid",
    "itemref",
    "itemscope",
    "itemtype",
    "lang",
    "media",
    "ns1:type",
    "ns2:alphabet",
    "ns2:ph",
    "onabort",
    "onblur",
    "oncanplay",
    "oncanplaythrough",
    "onchange",
    "onclick",
    "oncontextmenu",
    "ondblclick",
    "ondrag",
    "ondragend",
    "ondragenter",
    "ondragleave",
    "ondragover",
    "ondragstart",
    "ondrop",
    "ondurationchange",
    "onemptied",
    "onended",
    "onerror",
    "onfocus",
    "oninput",
    "oninvalid",
    "onkeydown",
    "onkeypress",
    "onkeyup",
    "onload",
    "onloadeddata",
    "onloadedmetadata",
    "onloadstart",
    "onmousedown",
    "onmousemove",
    "onmouseout",
    "onmouseover",
    "onmouseup",
    "onmousewheel",
    "onpause",
    "onplay",
    "onplaying",
    "onprogress",
    "onratechange",
    "onreadystatechange",
    "onreset",
    "onscroll",
    "onseeked",
    "onseeking",
    "onselect",
    "onshow",
    "onstalled",
    "onsubmit",
    "onsuspend",
    "ontimeupdate",
    "onvolumechange",
    "onwaiting",
    "prefix",
    "property",
    "rel",
    "resource",
    "rev",
    "role",
    "rowspan",
    "spellcheck",
    "src",
    "style",
    "tabindex",
    "target",
    "title",
    "type",
    "typeof",
    "vocab",
    "width",
    "xml:base",
    "xml:lang",
    "xml:space",
];

/// Tags legal in an EPUB 2 (XHTML 1.1) content document.
pub const XHTML11_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "address", "applet", "b", "bar", "basefont", "bdo", "big",
    "blockquote", "br", "caption", "center", "cite", "code", "col", "colgroup", "dd", "del",
    "dfn", "div", "dl", "dt", "em", "embed", "font", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
    "i", "iframe", "img", "ins", "kbd", "li", "map", "noscript", "ns:svg", "object", "ol", "p",
    "param", "pre", "q", "s", "samp", "script", "small", "span", "strike", "strong", "sub",
    "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "tt", "u", "ul", "var",
];

pub fn is_allowed_attribute(name: &str) -> bool {
    ALLOWED_ATTRIBUTES.binary_search(&name).is_ok()
}

pub fn is_xhtml11_tag(tag: &str) -> bool {
    XHTML11_TAGS.binary_search(&tag).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_sorted_for_lookup() {
        assert!(ALLOWED_ATTRIBUTES.windows(2).all(|w| w[0] < w[1]));
        assert!(XHTML11_TAGS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_lookups() {
        assert!(is_allowed_attribute("aria-label"));
        assert!(is_allowed_attribute("xml:lang"));
        assert!(!is_allowed_attribute("data-x"));
        assert!(!is_allowed_attribute("lang:xml"));
        assert!(is_xhtml11_tag("blockquote"));
        assert!(!is_xhtml11_tag("section"));
        assert!(!is_xhtml11_tag("figure"));
    }
}
