use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    #[error("could not determine the user home directory")]
    HomeNotFound,

    #[error("environment variable {var} is not set")]
    MissingEnv { var: &'static str },

    #[error("command failed: {cmd}, source: {source}")]
    CommandFailed { cmd: String, source: std::io::Error },

    #[error("command {cmd} exited with {status}: {stderr}")]
    CommandStatus {
        cmd: String,
        status: String,
        stderr: String,
    },

    #[error("failed to write script {}: {source}", path.display())]
    Script {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Filesystem(#[from] hoist_fs::Error),
}
