use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported archive format: '{name}'")]
    UnsupportedFormat { name: String },

    #[error("archive is corrupted: {reason}")]
    Corrupted { reason: String },

    #[error("entry '{}' escapes the destination directory", entry.display())]
    PathTraversal { entry: PathBuf },

    #[error("entry path or link target is malformed")]
    InvalidPath,

    #[error("symlink target escapes destination: '{}' -> '{}'", link.display(), target.display())]
    SymlinkEscape { link: PathBuf, target: PathBuf },

    #[error("symlink target is an absolute path: '{}' in '{}'", target.display(), link.display())]
    AbsoluteSymlinkTarget { link: PathBuf, target: PathBuf },

    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to extract '{}': {source}", path.display())]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to open archive {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("filesystem operation failed: {source}")]
    Filesystem { source: hoist_fs::Error },
}

impl From<hoist_fs::Error> for Error {
    fn from(e: hoist_fs::Error) -> Self {
        Self::Filesystem { source: e }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
