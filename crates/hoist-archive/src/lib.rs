//! Release archive extraction with path sanitization.
//!
//! # Architecture
//!
//! - `format.rs` - Format inference from file names
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `extract/` - Shared extraction loop and per-format entry sources
//! - `entry.rs` - Extracted entry records and the extraction report

pub use entry::{ArchiveReport, Entry, EntryKind};
pub use error::{Error, Result};
pub use extract::{EntrySource, extract, extract_from_reader, extract_with_source};
pub use format::ArchiveFormat;
pub use sanitize::{SanitizedPath, sanitize_path, sanitize_symlink_target};

pub mod entry;
mod error;
pub mod extract;
mod format;
mod sanitize;
