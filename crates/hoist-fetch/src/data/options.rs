use std::fmt;
use std::path::PathBuf;

use super::progress::{Progress, ProgressCallback};

pub const DEFAULT_USER_AGENT: &str = concat!("hoist/", env!("CARGO_PKG_VERSION"));

/// Configuration for a [`Fetcher`](crate::Fetcher).
///
/// ```
/// use hoist_fetch::FetchOptions;
///
/// let options = FetchOptions::default()
///     .temp_dir("/var/tmp")
///     .header("Accept", "application/octet-stream");
/// ```
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Directory for the temporary archive file. System temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    pub on_progress: Option<ProgressCallback>,
}

impl FetchOptions {
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(callback) = &self.on_progress {
            callback(&progress);
        }
    }
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("temp_dir", &self.temp_dir)
            .field("headers", &self.headers)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}
