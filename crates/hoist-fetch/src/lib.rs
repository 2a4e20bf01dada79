//! Release archive downloading.
//!
//! # Architecture
//!
//! - [`data`] - Archive sources, options and progress snapshots
//! - `effects` - The HTTP seam and the [`Fetcher`]
//!
//! Archives are streamed into a temporary file that deletes itself on drop,
//! so neither a failed download nor a failed extraction leaves files behind.

pub mod data;
mod effects;
mod error;

pub use data::{ArchiveSource, DEFAULT_USER_AGENT, FetchOptions, FetchPhase, Progress, ProgressCallback};
pub use effects::{BoxStream, DownloadedArchive, Fetcher, HttpClient, Response};
#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
pub use error::{Error, Result};
