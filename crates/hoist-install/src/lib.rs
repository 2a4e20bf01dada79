//! Install transaction for self-updating programs.
//!
//! # Architecture
//!
//! - `config` - Defaults, TOML file and environment overrides
//! - `release` - Latest-release lookup
//! - `pipeline` - The [`Installer`] state machine
//! - `hooks` - Post-install hooks, including the launcher
//! - `data` - States, hook context and the install report

pub mod config;
mod data;
mod error;
pub mod hooks;
mod pipeline;
pub mod release;

pub use config::InstallConfig;
pub use data::{InstallContext, InstallReport, InstallState};
pub use error::{HookError, InstallError, Result};
pub use hooks::{InstallHook, LauncherHook};
pub use pipeline::Installer;
