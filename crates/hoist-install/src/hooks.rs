//! Hook traits for install lifecycle.
//!
//! Hooks run after the new version is in place. A failing hook is reported
//! but does not fail the install.

use hoist_platform::{Launcher, UserDirs};

use crate::data::InstallContext;
use crate::error::HookError;

pub trait InstallHook: Send + Sync {
    /// Name of this hook for error reporting.
    fn name(&self) -> &'static str;

    /// Called once the install root holds the new version.
    fn post_install(&self, _ctx: &InstallContext<'_>) -> Result<(), HookError> {
        Ok(())
    }
}

/// Creates the platform launcher: a home-directory symlink on Unix,
/// Desktop and Start Menu shortcuts on Windows.
pub struct LauncherHook {
    dirs: UserDirs,
}

impl LauncherHook {
    pub fn new(dirs: UserDirs) -> Self {
        Self { dirs }
    }
}

impl InstallHook for LauncherHook {
    fn name(&self) -> &'static str {
        "launcher"
    }

    fn post_install(&self, ctx: &InstallContext<'_>) -> Result<(), HookError> {
        Launcher::new(ctx.program, ctx.install_root)
            .create(ctx.platform.os, &self.dirs)
            .map(|_| ())
            .map_err(|e| HookError::HookFailed {
                name: self.name().to_string(),
                source: Box::new(e),
            })
    }
}
