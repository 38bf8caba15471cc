//! Error types for epub-gen operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::package::TemplateKind;

/// Errors that can occur while building an EPUB.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete book options. Always reported before any I/O.
    #[error("Invalid options: {0}")]
    Config(String),

    #[error("Custom font not found at {}.", .0.display())]
    FontNotFound(PathBuf),

    #[error("{kind} template not found at {}", .path.display())]
    TemplateNotFound { kind: TemplateKind, path: PathBuf },

    #[error("Template error: {0}")]
    Template(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to fetch {url} after {attempts} attempt(s): {source}")]
    Fetch {
        url: String,
        attempts: u32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The archive was written but the staging directory could not be removed.
    #[error("Failed to remove staging directory {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
