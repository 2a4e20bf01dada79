use std::path::PathBuf;

use clap::{ArgAction, Parser};
use hoist_install::{InstallConfig, Result};

#[derive(Clone, Debug, Parser)]
#[command(name = "hoist", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct App {
    /// TOML file with install settings.
    #[arg(long, env = "HOIST_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Release repository as `owner/name`.
    #[arg(long, value_name = "OWNER/NAME")]
    pub repository: Option<String>,

    /// Program name, used for asset, install directory and launcher names.
    #[arg(long)]
    pub program: Option<String>,

    /// Install this version tag instead of the latest release.
    #[arg(long, value_name = "VERSION")]
    pub tag: Option<String>,

    #[arg(long, value_name = "PATH")]
    pub install_root: Option<PathBuf>,

    #[arg(long, value_name = "URL")]
    pub release_host: Option<String>,

    #[arg(long, value_name = "URL")]
    pub api_host: Option<String>,

    /// Do not create the symlink or shortcuts.
    #[arg(long)]
    pub no_launcher: bool,

    /// Exit right away instead of waiting for Enter.
    #[arg(long)]
    pub no_wait: bool,

    /// More log output; repeat for trace level.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl App {
    /// Defaults, then the config file, then the environment, then flags.
    pub fn load_config(&self) -> Result<InstallConfig> {
        let base = match &self.config {
            Some(path) => InstallConfig::load(path)?,
            None => InstallConfig::default(),
        };
        Ok(self.apply_flags(base.with_env_overrides()))
    }

    fn apply_flags(&self, mut config: InstallConfig) -> InstallConfig {
        if let Some(repository) = &self.repository {
            config.repository = repository.clone();
        }
        if let Some(program) = &self.program {
            config.program = program.clone();
        }
        if let Some(tag) = &self.tag {
            config.version = Some(tag.clone());
        }
        if let Some(root) = &self.install_root {
            config.install_root = Some(root.clone());
        }
        if let Some(host) = &self.release_host {
            config.release_host = host.clone();
        }
        if let Some(host) = &self.api_host {
            config.api_host = host.clone();
        }
        config
    }
}
