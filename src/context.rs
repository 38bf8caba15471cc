//! The immutable build context derived from [`BookOptions`].
//!
//! [`BookContext::from_options`] validates the options, applies defaults,
//! plans and sanitizes every chapter and catalogs the images. Later stages
//! only read from it.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::images::ImageCatalog;
use crate::options::{BookOptions, EpubVersion};
use crate::package::TemplateOverrides;
use crate::plan::plan_chapters;
use crate::sanitize::Sanitizer;
use crate::util::{MediaType, detect_media_type};

pub const DEFAULT_PUBLISHER: &str = "anonymous";
pub const DEFAULT_AUTHOR: &str = "anonymous";
pub const DEFAULT_TOC_TITLE: &str = "Table Of Contents";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Name of the directory under the system temp dir used for staging.
pub const STAGING_DIR_NAME: &str = "epub-gen";

/// A planned and sanitized chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// `item_<index>`.
    pub id: String,
    /// Path relative to `OEBPS`, always ending in `.xhtml`.
    pub href: String,
    pub output_path: PathBuf,
    /// Parent directory of `output_path`.
    pub directory: PathBuf,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub exclude_from_toc: bool,
    pub before_toc: bool,
    pub url: Option<String>,
    /// Body content: raw input after planning, XHTML after sanitization.
    pub content: String,
}

/// Book-level metadata with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: String,
    /// Never empty.
    pub authors: Vec<String>,
    pub publisher: String,
    pub description: String,
    pub lang: String,
    pub toc_title: String,
    pub date: String,
    pub keywords: Vec<String>,
    pub source: Option<String>,
}

/// A font file to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile {
    pub source: PathBuf,
    /// Base name under `OEBPS/fonts`.
    pub file_name: String,
}

impl FontFile {
    fn new(source: PathBuf) -> Self {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string_lossy().into_owned());
        Self { source, file_name }
    }

    pub fn href(&self) -> String {
        format!("fonts/{}", self.file_name)
    }

    pub fn media_type(&self) -> &'static str {
        detect_media_type(&self.file_name).mime_type()
    }
}

/// The cover image source and its resolved format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub source: String,
    pub format: MediaType,
}

impl CoverImage {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let format = detect_media_type(&source);
        Self { source, format }
    }

    /// `cover.<extension>`, relative to `OEBPS`.
    pub fn file_name(&self) -> String {
        format!("cover.{}", self.format.extension())
    }

    pub fn media_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Everything a build needs, derived once from the options.
#[derive(Debug, Clone)]
pub struct BookContext {
    pub id: Uuid,
    /// Staging directory for this build. Does not exist until the
    /// package is built.
    pub package_root: PathBuf,
    pub output: PathBuf,
    pub version: EpubVersion,
    pub metadata: BookMetadata,
    pub append_chapter_titles: bool,
    /// Stylesheet override; the bundled default is used when absent.
    pub css: Option<String>,
    pub fonts: Vec<FontFile>,
    pub cover: Option<CoverImage>,
    pub templates: TemplateOverrides,
    pub chapters: Vec<Chapter>,
    pub images: ImageCatalog,
}

impl BookContext {
    /// Validate `options` and derive the context. Performs no I/O.
    pub fn from_options(options: BookOptions) -> Result<Self> {
        options.validate()?;

        let id = Uuid::new_v4();
        let staging_parent = options
            .temp_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(STAGING_DIR_NAME));
        let package_root = staging_parent.join(id.to_string());

        let title = options.title.unwrap_or_default();
        let mut authors = options.author.map(|a| a.into_vec()).unwrap_or_default();
        if authors.is_empty() {
            authors.push(DEFAULT_AUTHOR.to_string());
        }

        let metadata = BookMetadata {
            description: options.description.unwrap_or_else(|| title.clone()),
            title,
            authors,
            publisher: options
                .publisher
                .unwrap_or_else(|| DEFAULT_PUBLISHER.to_string()),
            lang: options.lang.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            toc_title: options
                .toc_title
                .unwrap_or_else(|| DEFAULT_TOC_TITLE.to_string()),
            date: options
                .date
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            keywords: options.keywords,
            source: options.source,
        };

        let content_dir = package_root.join("OEBPS");
        let mut chapters = plan_chapters(options.content, &content_dir);

        let sanitizer = Sanitizer::new(options.version).trust_content(options.trust_content);
        let mut images = ImageCatalog::new();
        for (index, chapter) in chapters.iter_mut().enumerate() {
            let sanitized = sanitizer.sanitize(index, &chapter.content, &chapter.directory);
            debug!(
                chapter = %chapter.href,
                images = sanitized.images.len(),
                "sanitized chapter"
            );
            chapter.content = sanitized.body;
            images.extend(sanitized.images);
        }

        Ok(Self {
            id,
            package_root,
            output: options.output.unwrap_or_default(),
            version: options.version,
            metadata,
            append_chapter_titles: options.append_chapter_titles.unwrap_or(true),
            css: options.css,
            fonts: options.fonts.into_iter().map(FontFile::new).collect(),
            cover: options.cover.map(CoverImage::new),
            templates: TemplateOverrides {
                opf: options.custom_opf_template_path,
                ncx_toc: options.custom_ncx_toc_template_path,
                html_toc: options.custom_html_toc_template_path,
            },
            chapters,
            images,
        })
    }

    /// The `OEBPS` directory inside the package root.
    pub fn content_dir(&self) -> PathBuf {
        self.package_root.join("OEBPS")
    }

    pub fn meta_inf_dir(&self) -> PathBuf {
        self.package_root.join("META-INF")
    }

    pub fn staging_parent(&self) -> Option<&Path> {
        self.package_root.parent()
    }

    /// XML declaration, doctype and `<html>` start tag for content documents.
    pub fn doc_header(&self) -> String {
        let doctype = match self.version {
            EpubVersion::V2 => {
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">"#
            }
            EpubVersion::V3 => "<!DOCTYPE html>",
        };
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doctype}\n<html xmlns=\"http://www.w3.org/1999/xhtml\" lang=\"{}\">",
            crate::util::escape_xml(&self.metadata.lang)
        )
    }

    /// Chapters listed before the HTML table of contents.
    pub fn chapters_before_toc(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter().filter(|c| c.before_toc)
    }

    /// Chapters listed after the HTML table of contents.
    pub fn chapters_after_toc(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter().filter(|c| !c.before_toc)
    }
}
