use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::os::Os;

/// Per-user directories the installer reads from the environment.
///
/// Captured once so callers (and tests) can substitute their own values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirs {
    pub home: Option<PathBuf>,
    /// `%LOCALAPPDATA%`
    pub local_app_data: Option<PathBuf>,
    /// `%APPDATA%`
    pub app_data: Option<PathBuf>,
}

impl UserDirs {
    pub fn from_env() -> Self {
        Self {
            home: home::home_dir(),
            local_app_data: env::var_os("LOCALAPPDATA").map(PathBuf::from),
            app_data: env::var_os("APPDATA").map(PathBuf::from),
        }
    }

    pub fn home(&self) -> Result<&Path> {
        self.home.as_deref().ok_or(Error::HomeNotFound)
    }

    /// Where `program` is installed on `os`.
    ///
    /// Linux: `~/.local/<program>`; Windows: `%LOCALAPPDATA%\<program>`.
    pub fn install_location(&self, os: Os, program: &str) -> Result<PathBuf> {
        match os {
            Os::Linux => Ok(self.home()?.join(".local").join(program)),
            Os::Windows => {
                let base = self
                    .local_app_data
                    .as_deref()
                    .ok_or(Error::MissingEnv { var: "LOCALAPPDATA" })?;
                Ok(base.join(program))
            }
            other => Err(Error::UnsupportedPlatform {
                os: other.to_string(),
            }),
        }
    }

    pub fn desktop(&self) -> Result<PathBuf> {
        Ok(self.home()?.join("Desktop"))
    }

    /// `%APPDATA%\Microsoft\Windows\Start Menu\Programs`
    pub fn start_menu_programs(&self) -> Result<PathBuf> {
        let base = self
            .app_data
            .as_deref()
            .ok_or(Error::MissingEnv { var: "APPDATA" })?;
        Ok(base
            .join("Microsoft")
            .join("Windows")
            .join("Start Menu")
            .join("Programs"))
    }
}
