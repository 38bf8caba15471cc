//! Book builds: the [`Epub`] pipeline and the archive writer.

mod writer;

pub use writer::{archive_and_clean, write_archive, write_archive_to_writer};

use std::path::PathBuf;

use futures::future::try_join_all;
use tracing::info;

use crate::context::BookContext;
use crate::error::Result;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::options::BookOptions;
use crate::package::{DefaultRenderer, PackageBuilder, TemplateRenderer};

/// One book build.
///
/// Construction validates the options and prepares every chapter without
/// touching the filesystem. [`Epub::render`] then writes the staging tree,
/// fetches images and the cover, archives the tree to the output path and
/// removes it.
///
/// ```no_run
/// use epub_gen::{BookOptions, ChapterInput, Epub};
///
/// # async fn run() -> epub_gen::Result<()> {
/// let options = BookOptions::new("Ulysses")
///     .with_author("James Joyce")
///     .with_output("ulysses.epub")
///     .with_chapter(ChapterInput::new("<p>Stately, plump Buck Mulligan</p>").with_title("Telemachus"));
///
/// let path = Epub::new(options)?.render().await?;
/// # Ok(())
/// # }
/// ```
pub struct Epub {
    book: BookContext,
    fetcher: Box<dyn Fetcher>,
    renderer: Box<dyn TemplateRenderer>,
}

impl Epub {
    pub fn new(options: BookOptions) -> Result<Self> {
        Ok(Self {
            book: BookContext::from_options(options)?,
            fetcher: Box::new(HttpFetcher::new()),
            renderer: Box::new(DefaultRenderer),
        })
    }

    /// Replace the collaborator used to fetch images and the cover.
    pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Replace the collaborator used to render the OPF, NCX and HTML toc.
    pub fn with_renderer(mut self, renderer: impl TemplateRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn context(&self) -> &BookContext {
        &self.book
    }

    /// Run the build and return the path of the written archive.
    pub async fn render(self) -> Result<PathBuf> {
        info!("Generating template files");
        PackageBuilder::new(&self.book, &*self.renderer)
            .build()
            .await?;

        info!(count = self.book.images.len(), "Downloading images");
        self.download_images().await?;

        info!("Making cover");
        self.make_cover().await?;

        info!("Generating epub files");
        archive_and_clean(self.book.package_root, self.book.output).await
    }

    async fn download_images(&self) -> Result<()> {
        if self.book.images.is_empty() {
            return Ok(());
        }

        let images_dir = self.book.content_dir().join("images");
        tokio::fs::create_dir(&images_dir).await?;
        try_join_all(self.book.images.iter().map(|image| {
            let dest = images_dir.join(image.file_name());
            async move { self.fetcher.fetch(&image.url, &dest).await }
        }))
        .await?;
        Ok(())
    }

    async fn make_cover(&self) -> Result<()> {
        let Some(ref cover) = self.book.cover else {
            return Ok(());
        };
        let dest = self.book.content_dir().join(cover.file_name());
        self.fetcher.fetch(&cover.source, &dest).await
    }
}

/// Build the book described by `options` with the default collaborators.
pub async fn generate(options: BookOptions) -> Result<PathBuf> {
    Epub::new(options)?.render().await
}
