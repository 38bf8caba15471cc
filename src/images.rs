//! The book-wide catalog of images found in chapter content.

use std::path::PathBuf;

use uuid::Uuid;

use crate::util::{MediaType, detect_media_type};

/// One `<img>` occurrence that must be fetched into the package.
///
/// Every occurrence gets its own entry and id, even when the same source
/// URL appears more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Fresh unique token; also the file stem under `OEBPS/images`.
    pub id: String,
    /// The original `src` value.
    pub url: String,
    /// Output directory of the chapter the image was found in.
    pub dir: PathBuf,
    pub media_type: &'static str,
    pub extension: &'static str,
}

impl ImageReference {
    /// Create a reference with a freshly generated id.
    pub fn new(url: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let url = url.into();
        let format = detect_media_type(&url);
        Self::with_id(Uuid::new_v4().to_string(), url, dir, format)
    }

    pub(crate) fn with_id(
        id: String,
        url: String,
        dir: impl Into<PathBuf>,
        format: MediaType,
    ) -> Self {
        Self {
            id,
            url,
            dir: dir.into(),
            media_type: format.mime_type(),
            extension: format.extension(),
        }
    }

    /// File name inside `OEBPS/images`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.extension)
    }

    /// Package-relative href, as written into the rewritten `src`.
    pub fn href(&self) -> String {
        format!("images/{}", self.file_name())
    }

    /// Manifest id. Uuids may start with a digit, which is not a valid XML name.
    pub fn manifest_id(&self) -> String {
        format!("image_{}", self.id)
    }
}

/// Append-only, ordered list of image references.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    entries: Vec<ImageReference>,
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, image: ImageReference) {
        self.entries.push(image);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageReference> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[ImageReference] {
        &self.entries
    }
}

impl Extend<ImageReference> for ImageCatalog {
    fn extend<T: IntoIterator<Item = ImageReference>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ImageCatalog {
    type Item = &'a ImageReference;
    type IntoIter = std::slice::Iter<'a, ImageReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
