//! Install configuration.
//!
//! Values come from built-in defaults, an optional TOML file, the
//! `PROGRAM_VERSION` environment variable and command-line flags, in
//! increasing order of precedence. Only the first three are handled here.

use std::path::{Component, Path, PathBuf};

use hoist_fetch::{DEFAULT_USER_AGENT, FetchOptions};
use hoist_platform::Platform;
use serde::{Deserialize, Serialize};

use crate::error::{InstallError, Result};

/// Environment variable that pins the version to install.
pub const VERSION_ENV: &str = "PROGRAM_VERSION";

pub const DEFAULT_REPOSITORY: &str = "ntillier/ConnectionInternat";
pub const DEFAULT_PROGRAM: &str = "ConnectionInternat";
pub const DEFAULT_RELEASE_HOST: &str = "https://github.com";
pub const DEFAULT_API_HOST: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallConfig {
    /// `owner/name` of the release repository.
    pub repository: String,
    /// Program name; also the install directory and launcher name.
    pub program: String,
    /// Version tag to install instead of the latest release.
    pub version: Option<String>,
    pub release_host: String,
    pub api_host: String,
    /// Overrides the per-OS install location.
    pub install_root: Option<PathBuf>,
    /// Parent of the scratch directory and the downloaded archive.
    pub scratch_root: Option<PathBuf>,
    pub user_agent: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            program: DEFAULT_PROGRAM.to_string(),
            version: None,
            release_host: DEFAULT_RELEASE_HOST.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            install_root: None,
            scratch_root: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl InstallConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| InstallError::Configuration(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InstallError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `PROGRAM_VERSION` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values count as unset.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(version) = lookup(VERSION_ENV).filter(|v| !v.trim().is_empty()) {
            self.version = Some(version.trim().to_string());
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(InstallError::Configuration(msg));

        match self.repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
            _ => return invalid(format!("repository '{}' is not 'owner/name'", self.repository)),
        }
        if !is_plain_name(&self.program) {
            return invalid(format!("program name '{}' is not a plain name", self.program));
        }
        for (field, host) in [("release_host", &self.release_host), ("api_host", &self.api_host)] {
            if !(host.starts_with("http://") || host.starts_with("https://")) {
                return invalid(format!("{field} '{host}' is not an http(s) URL"));
            }
        }
        if let Some(version) = &self.version
            && !is_plain_name(version)
        {
            return invalid(format!("version '{version}' is not a plain name"));
        }
        Ok(())
    }

    /// `GET` endpoint for the latest release metadata.
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/releases/latest",
            self.api_host.trim_end_matches('/'),
            self.repository
        )
    }

    /// Download URL of the release archive for `platform`.
    pub fn download_url(&self, version: &str, platform: &Platform) -> Result<String> {
        Ok(format!(
            "{}/{}/releases/download/{}/{}",
            self.release_host.trim_end_matches('/'),
            self.repository,
            version,
            platform.asset_name(&self.program, version)?
        ))
    }

    /// Fetch options carrying the scratch root as temp directory.
    pub fn fetch_options(&self) -> FetchOptions {
        let mut options = FetchOptions::default();
        options.temp_dir = self.scratch_root.clone();
        options
    }
}

/// Whether `name` is exactly one normal path component.
///
/// Program names and versions become directory names under the install and
/// scratch roots, so `.`, `..` and separators are refused.
pub fn is_plain_name(name: &str) -> bool {
    if name.trim().is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
