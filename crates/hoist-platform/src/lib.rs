//! Platform facts and per-user integration for hoist.

pub use arch::Arch;
pub use dir::UserDirs;
pub use error::{Error, Result};
pub use launcher::Launcher;
pub use os::Os;
pub use target::Platform;

pub mod arch;
pub mod command;
pub mod dir;
mod error;
pub mod launcher;
pub mod os;
mod target;
