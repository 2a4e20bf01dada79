//! Immutable configuration and progress types.

pub mod options;
pub mod progress;
pub mod source;

pub use options::{DEFAULT_USER_AGENT, FetchOptions};
pub use progress::{FetchPhase, Progress, ProgressCallback};
pub use source::ArchiveSource;
