use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("source is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("destination already exists and overwrite is disabled: {}", path.display())]
    DestinationExists { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to remove {}: {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("symlink not supported on this platform: {}", path.display())]
    SymlinkNotSupported { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Path the failed operation was acting on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotADirectory { path }
            | Self::DestinationExists { path }
            | Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Remove { path, .. }
            | Self::SymlinkNotSupported { path } => path,
        }
    }
}
