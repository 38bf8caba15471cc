//! # epub-gen
//!
//! Generate EPUB 2 and EPUB 3 books from HTML chapter fragments.
//!
//! ## Features
//!
//! - Sanitizes arbitrary chapter HTML into XHTML legal for the target version
//! - Collects `<img>` sources and packages the images alongside the text
//! - Embeds fonts, a cover image and a stylesheet
//! - Generates the OPF package, NCX and HTML tables of contents, or renders
//!   them from custom template files
//! - Writes an OCF container with `mimetype` stored first
//!
//! ## Quick Start
//!
//! ```no_run
//! use epub_gen::{BookOptions, ChapterInput, generate};
//!
//! # async fn run() -> epub_gen::Result<()> {
//! let options = BookOptions::new("Alice's Adventures in Wonderland")
//!     .with_author("Lewis Carroll")
//!     .with_output("alice.epub")
//!     .with_chapter(
//!         ChapterInput::new("<p>Alice was beginning to get very tired…</p>")
//!             .with_title("Down the Rabbit-Hole"),
//!     );
//!
//! generate(options).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Building in Steps
//!
//! [`Epub::new`] does all the in-memory work (validation, file naming,
//! sanitization) and can be inspected before anything is written:
//!
//! ```
//! use epub_gen::{BookOptions, ChapterInput, Epub};
//!
//! let epub = Epub::new(
//!     BookOptions::new("Notes")
//!         .with_output("notes.epub")
//!         .with_chapter(ChapterInput::new("<p>See <img src='fig.png'></p>").with_title("Figures")),
//! )
//! .unwrap();
//!
//! let book = epub.context();
//! assert_eq!(book.chapters[0].href, "0_figures.xhtml");
//! assert_eq!(book.images.len(), 1);
//! ```

pub mod context;
pub mod dom;
pub mod epub;
pub mod error;
pub mod fetch;
pub mod images;
pub mod options;
pub mod package;
pub mod plan;
pub mod sanitize;
pub mod util;

pub use context::{BookContext, BookMetadata, Chapter, CoverImage, FontFile};
pub use epub::{Epub, generate, write_archive, write_archive_to_writer};
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpFetcher, RetryPolicy};
pub use images::{ImageCatalog, ImageReference};
pub use options::{Authors, BookOptions, ChapterInput, EpubVersion};
pub use package::{TemplateKind, TemplateRenderer, TemplateSource};
pub use sanitize::{SanitizedChapter, Sanitizer};
