//! Error types for install operations.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of an install transaction. Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("download failed: {0}")]
    Download(#[source] hoist_fetch::Error),

    #[error("extraction failed: {0}")]
    Extract(#[source] hoist_archive::Error),

    #[error("archive does not contain the expected directory '{expected}'")]
    LayoutMismatch { expected: String },

    #[error("failed to put the new version in place: {0}")]
    Transplant(#[source] hoist_fs::Error),

    #[error("{0}")]
    Platform(#[from] hoist_platform::Error),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("could not determine the latest version: {0}")]
    VersionResolution(#[source] hoist_fetch::Error),

    #[error("failed to create scratch directory in {}: {source}", path.display())]
    Scratch {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl InstallError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            InstallError::Platform(_) | InstallError::Configuration(_) => 2,
            InstallError::Download(_) => 3,
            InstallError::Extract(_) => 4,
            InstallError::LayoutMismatch { .. } => 5,
            InstallError::Transplant(_) | InstallError::Scratch { .. } => 6,
            InstallError::VersionResolution(_) => 7,
        }
    }
}

impl From<hoist_fetch::Error> for InstallError {
    fn from(e: hoist_fetch::Error) -> Self {
        match e {
            hoist_fetch::Error::Extract(inner) => InstallError::Extract(inner),
            other => InstallError::Download(other),
        }
    }
}

/// Hook execution errors.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("hook failed: {name}: {source}")]
    HookFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, InstallError>;
