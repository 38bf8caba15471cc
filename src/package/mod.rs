//! Package assembly: writes the staging tree that becomes the EPUB.
//!
//! Layout under the package root:
//!
//! ```text
//! mimetype
//! META-INF/container.xml
//! META-INF/com.apple.ibooks.display-options.xml   (EPUB 2 only)
//! OEBPS/style.css
//! OEBPS/fonts/*
//! OEBPS/images/*
//! OEBPS/<chapter href>
//! OEBPS/content.opf
//! OEBPS/toc.ncx
//! OEBPS/toc.xhtml
//! ```

mod document;
mod nav;
mod ncx;
mod opf;
mod templates;

pub use document::chapter_document;
pub use nav::chapter_label;
pub use opf::COVER_ID;
pub use templates::{
    DefaultRenderer, TemplateKind, TemplateOverrides, TemplateRenderer, TemplateSource,
    render_placeholders, resolve_template,
};

use std::path::Path;

use futures::future::try_join_all;
use tracing::debug;

use crate::context::BookContext;
use crate::error::{Error, Result};
use crate::options::EpubVersion;

pub const MIMETYPE: &str = "application/epub+zip";

pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// Apple Books display options enabling embedded fonts. Written for EPUB 2 only.
pub const IBOOKS_DISPLAY_OPTIONS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<display_options>
  <platform name="*">
    <option name="specified-fonts">true</option>
  </platform>
</display_options>"#;

pub const IBOOKS_DISPLAY_OPTIONS_FILE: &str = "com.apple.ibooks.display-options.xml";

/// Stylesheet used when the book supplies none.
pub const DEFAULT_CSS: &str = include_str!("../templates/template.css");

/// Writes every package file for one book.
pub struct PackageBuilder<'a> {
    book: &'a BookContext,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> PackageBuilder<'a> {
    pub fn new(book: &'a BookContext, renderer: &'a dyn TemplateRenderer) -> Self {
        Self { book, renderer }
    }

    /// Build the staging tree. Images and the cover are fetched separately.
    ///
    /// Any failure aborts the build and leaves whatever was written in place.
    pub async fn build(&self) -> Result<()> {
        self.create_root().await?;
        self.write_stylesheet().await?;
        self.copy_fonts().await?;
        self.write_chapters().await?;
        self.write_fixed_files().await?;
        self.render_templates().await
    }

    async fn create_root(&self) -> Result<()> {
        if let Some(parent) = self.book.staging_parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Fails if the root already exists.
        tokio::fs::create_dir(&self.book.package_root).await?;
        tokio::fs::create_dir(self.book.content_dir()).await?;
        Ok(())
    }

    async fn write_stylesheet(&self) -> Result<()> {
        let css = self.book.css.as_deref().unwrap_or(DEFAULT_CSS);
        write_file(&self.book.content_dir().join("style.css"), css).await
    }

    async fn copy_fonts(&self) -> Result<()> {
        if self.book.fonts.is_empty() {
            return Ok(());
        }

        for font in &self.book.fonts {
            if !tokio::fs::try_exists(&font.source).await? {
                return Err(Error::FontNotFound(font.source.clone()));
            }
        }

        let fonts_dir = self.book.content_dir().join("fonts");
        tokio::fs::create_dir(&fonts_dir).await?;
        try_join_all(self.book.fonts.iter().map(|font| {
            let dest = fonts_dir.join(&font.file_name);
            async move {
                tokio::fs::copy(&font.source, &dest).await?;
                debug!(font = %dest.display(), "copied font");
                Ok::<_, Error>(())
            }
        }))
        .await?;
        Ok(())
    }

    async fn write_chapters(&self) -> Result<()> {
        try_join_all(self.book.chapters.iter().map(|chapter| async move {
            tokio::fs::create_dir_all(&chapter.directory).await?;
            write_file(&chapter.output_path, &chapter_document(self.book, chapter)).await
        }))
        .await?;
        Ok(())
    }

    async fn write_fixed_files(&self) -> Result<()> {
        let root = &self.book.package_root;
        write_file(&root.join("mimetype"), MIMETYPE).await?;

        let meta_inf = self.book.meta_inf_dir();
        tokio::fs::create_dir(&meta_inf).await?;
        write_file(&meta_inf.join("container.xml"), CONTAINER_XML).await?;
        if self.book.version == EpubVersion::V2 {
            write_file(&meta_inf.join(IBOOKS_DISPLAY_OPTIONS_FILE), IBOOKS_DISPLAY_OPTIONS).await?;
        }
        Ok(())
    }

    async fn render_templates(&self) -> Result<()> {
        let overrides = &self.book.templates;
        let sources =
            try_join_all(TemplateKind::ALL.map(|kind| resolve_template(kind, overrides))).await?;

        try_join_all(
            TemplateKind::ALL
                .into_iter()
                .zip(&sources)
                .map(|(kind, source)| self.render_one(kind, source)),
        )
        .await?;
        Ok(())
    }

    async fn render_one(&self, kind: TemplateKind, source: &TemplateSource) -> Result<()> {
        let text = self.renderer.render(kind, source, self.book).await?;
        write_file(&self.book.content_dir().join(kind.output_name()), &text).await
    }
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents).await?;
    debug!(path = %path.display(), "wrote");
    Ok(())
}
