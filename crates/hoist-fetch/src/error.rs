//! Error types for hoist-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl { url: String, source: url::ParseError },

    #[error("URL '{url}' has no file name")]
    MissingFileName { url: String },

    /// The URL's file name does not map to a supported archive format.
    #[error("{0}")]
    Format(#[source] hoist_archive::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to create temporary file in {}: {source}", dir.display())]
    TempFile { dir: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },

    /// The archive downloaded but could not be extracted.
    #[error("{0}")]
    Extract(#[source] hoist_archive::Error),
}

impl Error {
    pub(crate) fn network(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
