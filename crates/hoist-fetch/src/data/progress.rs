use std::fmt;
use std::sync::Arc;

/// Phases of a fetch-and-extract operation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Request sent, waiting for the response head.
    #[default]
    Connecting,
    /// Streaming the body into the temporary file.
    Downloading,
    /// Unpacking the downloaded archive.
    Extracting,
    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "Connecting"),
            FetchPhase::Downloading => write!(f, "Downloading"),
            FetchPhase::Extracting => write!(f, "Extracting"),
            FetchPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Snapshot handed to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase: FetchPhase,
    /// Bytes written to the temporary file so far.
    pub bytes_downloaded: u64,
    /// From `Content-Length`; `None` for chunked responses.
    pub total_bytes: Option<u64>,
}

impl Progress {
    pub fn new(phase: FetchPhase, bytes_downloaded: u64, total_bytes: Option<u64>) -> Self {
        Self {
            phase,
            bytes_downloaded,
            total_bytes,
        }
    }

    /// Completion in percent, when the total is known.
    pub fn percentage(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) => Some(100.0),
            Some(total) => Some(self.bytes_downloaded as f64 / total as f64 * 100.0),
            None => None,
        }
    }
}

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;
