//! Slug generation for chapter file names.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Strip diacritics by decomposing and dropping combining marks.
///
/// ```
/// use epub_gen::plan::strip_diacritics;
///
/// assert_eq!(strip_diacritics("Café Über"), "Cafe Uber");
/// ```
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|&c| !is_combining_mark(c)).collect()
}

/// Generate a URL- and file-name-safe slug from text.
///
/// Letters and digits are lowercased and kept (including non-ASCII ones),
/// `_` and `~` are kept, whitespace and hyphens collapse into a single `-`,
/// and everything else is dropped.
///
/// ```
/// use epub_gen::plan::slugify;
///
/// assert_eq!(slugify("Chapter One"), "chapter-one");
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' || c == '~' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_with_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn test_slugify_leading_trailing_spaces() {
        assert_eq!(slugify("  Hello World  "), "hello-world");
    }

    #[test]
    fn test_slugify_keeps_underscore_and_tilde() {
        assert_eq!(slugify("hello_world ~x"), "hello_world-~x");
    }

    #[test]
    fn test_slugify_hyphens() {
        assert_eq!(slugify("hello--world"), "hello-world");
        assert_eq!(slugify("-hello-"), "hello");
    }

    #[test]
    fn test_slugify_unicode_letters() {
        assert_eq!(slugify("Глава Первая"), "глава-первая");
        assert_eq!(slugify("第一章"), "第一章");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("naïve façade"), "naive facade");
        assert_eq!(slugify(&strip_diacritics("Ärger im Paradies")), "arger-im-paradies");
    }
}
