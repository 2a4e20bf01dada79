//! Latest-release lookup against a GitHub-compatible API.

use hoist_fetch::{Fetcher, HttpClient};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{InstallConfig, is_plain_name};
use crate::error::{InstallError, Result};

pub const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// The part of the release metadata the installer reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

/// Tag name of the latest published release of `config.repository`.
pub async fn latest_version<C: HttpClient>(
    fetcher: &Fetcher<C>,
    config: &InstallConfig,
) -> Result<String> {
    let url = config.latest_release_url();
    debug!(%url, "querying latest release");

    let release: Release = fetcher
        .get_json(&url, &[("Accept".to_string(), GITHUB_JSON.to_string())])
        .await
        .map_err(InstallError::VersionResolution)?;

    let tag = release.tag_name.trim();
    if !is_plain_name(tag) {
        return Err(InstallError::VersionResolution(hoist_fetch::Error::Decode {
            url,
            message: format!("tag_name '{tag}' is not a plain name"),
        }));
    }
    info!(version = tag, "latest release");
    Ok(tag.to_string())
}
