//! Media type detection and XML escaping helpers.

use std::borrow::Cow;

// ============================================================================
// Media Type Detection
// ============================================================================

/// MIME type and file extension of an embedded resource.
///
/// Detection is done from the extension of a path or URL, or from a
/// `data:` URL header. Common book media resolve to a canonical pair;
/// everything else goes through the `mime_guess` database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaType {
    mime: &'static str,
    extension: &'static str,
}

impl MediaType {
    pub const JPEG: MediaType = MediaType::new("image/jpeg", "jpeg");
    pub const PNG: MediaType = MediaType::new("image/png", "png");
    pub const GIF: MediaType = MediaType::new("image/gif", "gif");
    pub const SVG: MediaType = MediaType::new("image/svg+xml", "svg");
    pub const WEBP: MediaType = MediaType::new("image/webp", "webp");
    pub const TTF: MediaType = MediaType::new("font/ttf", "ttf");
    pub const OTF: MediaType = MediaType::new("font/otf", "otf");
    pub const WOFF: MediaType = MediaType::new("font/woff", "woff");
    pub const WOFF2: MediaType = MediaType::new("font/woff2", "woff2");
    /// Anything unrecognized.
    pub const BINARY: MediaType = MediaType::new("application/octet-stream", "bin");

    const fn new(mime: &'static str, extension: &'static str) -> Self {
        Self { mime, extension }
    }

    pub fn mime_type(self) -> &'static str {
        self.mime
    }

    /// File extension (without the dot) used when the resource is stored.
    pub fn extension(self) -> &'static str {
        self.extension
    }

    /// Look up a type by file extension (without the dot).
    pub fn from_extension(ext: &str) -> MediaType {
        let ext = ext.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" | "jpe" => MediaType::JPEG,
            "png" => MediaType::PNG,
            "gif" => MediaType::GIF,
            "svg" => MediaType::SVG,
            "webp" => MediaType::WEBP,
            "ttf" => MediaType::TTF,
            "otf" => MediaType::OTF,
            "woff" => MediaType::WOFF,
            "woff2" => MediaType::WOFF2,
            _ => {
                let Some(mime) = mime_guess::from_ext(&ext).first_raw() else {
                    return MediaType::BINARY;
                };
                let Some(extensions) = mime_guess::get_mime_extensions_str(mime) else {
                    return MediaType::BINARY;
                };
                // Keep the caller's spelling when the database knows it.
                let extension = extensions
                    .iter()
                    .find(|e| **e == ext)
                    .or_else(|| extensions.first())
                    .copied()
                    .unwrap_or("bin");
                MediaType::new(mime, extension)
            }
        }
    }

    /// Look up a type by MIME type.
    pub fn from_mime(mime: &str) -> MediaType {
        let mime = mime.trim().to_ascii_lowercase();
        match mime.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => MediaType::JPEG,
            "image/png" => MediaType::PNG,
            "image/gif" => MediaType::GIF,
            "image/svg+xml" => MediaType::SVG,
            "image/webp" => MediaType::WEBP,
            "font/ttf" | "application/x-font-ttf" => MediaType::TTF,
            "font/otf" | "application/x-font-opentype" => MediaType::OTF,
            "font/woff" | "application/font-woff" => MediaType::WOFF,
            "font/woff2" => MediaType::WOFF2,
            _ => mime_guess::get_mime_extensions_str(&mime)
                .and_then(|extensions| extensions.first())
                .map_or(MediaType::BINARY, |ext| MediaType::from_extension(ext)),
        }
    }
}

/// Detect the media type of a file path or URL.
///
/// Query strings and fragments are ignored, so
/// `http://host/a.png?w=300#top` is detected as PNG. `data:` URLs are
/// resolved from their declared MIME type.
pub fn detect_media_type(source: &str) -> MediaType {
    if let Some(rest) = strip_prefix_ignore_case(source, "data:") {
        let header = rest.split(',').next().unwrap_or("");
        let mime = header.split(';').next().unwrap_or("");
        return MediaType::from_mime(mime);
    }

    let path = source.split(['?', '#']).next().unwrap_or(source);
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((_, ext)) => MediaType::from_extension(ext),
        None => MediaType::BINARY,
    }
}

pub(crate) fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

// ============================================================================
// XML Escaping
// ============================================================================

/// Escape text for use in XML element content or attribute values.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// Escape element text content (`<`, `>` and `&` only).
pub(crate) fn escape_text(s: &str) -> Cow<'_, str> {
    quick_xml::escape::partial_escape(s)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_media_type_by_extension() {
        assert_eq!(detect_media_type("image.jpg"), MediaType::JPEG);
        assert_eq!(detect_media_type("image.JPEG"), MediaType::JPEG);
        assert_eq!(detect_media_type("image.png"), MediaType::PNG);
        assert_eq!(detect_media_type("image.gif"), MediaType::GIF);
        assert_eq!(detect_media_type("image.svg"), MediaType::SVG);
        assert_eq!(detect_media_type("image.webp"), MediaType::WEBP);
        assert_eq!(detect_media_type("font.ttf"), MediaType::TTF);
        assert_eq!(detect_media_type("font.otf"), MediaType::OTF);
        assert_eq!(detect_media_type("unknown"), MediaType::BINARY);
    }

    #[test]
    fn test_detect_less_common_image_types() {
        let bmp = detect_media_type("http://x/a.bmp");
        assert_eq!(bmp.mime_type(), "image/bmp");
        assert_eq!(bmp.extension(), "bmp");

        let tiff = detect_media_type("c.TIFF");
        assert_eq!(tiff.mime_type(), "image/tiff");
        assert_eq!(tiff.extension(), "tiff");

        let tif = detect_media_type("scan.tif?v=2");
        assert_eq!(tif.mime_type(), "image/tiff");
        assert_eq!(tif.extension(), "tif");

        let ico = detect_media_type("favicon.ico");
        assert!(ico.mime_type().starts_with("image/"));
        assert_eq!(ico.extension(), "ico");
    }

    #[test]
    fn test_unknown_extension_is_binary() {
        assert_eq!(detect_media_type("archive.notarealext"), MediaType::BINARY);
        assert_eq!(MediaType::BINARY.mime_type(), "application/octet-stream");
        assert_eq!(MediaType::BINARY.extension(), "bin");
    }

    #[test]
    fn test_detect_media_type_from_url() {
        assert_eq!(
            detect_media_type("http://x/y.png?size=large#frag"),
            MediaType::PNG
        );
        assert_eq!(
            detect_media_type("https://cdn.example.com/a.b/photo"),
            MediaType::BINARY
        );
        assert_eq!(detect_media_type("file:///tmp/cover.JPG"), MediaType::JPEG);
    }

    #[test]
    fn test_detect_media_type_from_data_url() {
        assert_eq!(
            detect_media_type("data:image/png;base64,iVBORw0KGgo="),
            MediaType::PNG
        );
        assert_eq!(
            detect_media_type("DATA:image/svg+xml,%3Csvg%3E"),
            MediaType::SVG
        );
        assert_eq!(
            detect_media_type("data:image/bmp;base64,Qk0=").mime_type(),
            "image/bmp"
        );
    }

    #[test]
    fn test_media_type_mime_and_extension() {
        assert_eq!(MediaType::JPEG.mime_type(), "image/jpeg");
        assert_eq!(MediaType::JPEG.extension(), "jpeg");
        assert_eq!(MediaType::from_mime("image/jpg"), MediaType::JPEG);
        assert_eq!(MediaType::SVG.mime_type(), "image/svg+xml");
        assert_eq!(MediaType::from_mime("application/x-nothing"), MediaType::BINARY);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Hello & World"), "Hello &amp; World");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_text("a < b & \"c\""), "a &lt; b &amp; \"c\"");
    }
}
