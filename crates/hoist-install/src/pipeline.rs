//! The install transaction.
//!
//! `ResolvingVersion → Downloading → Extracting → RemovingOldInstall →
//! Transplanting → CleaningUp → Done`, with `Failed` reachable from any stage.
//! Nothing is retried.
//!
//! The old install is only removed once the new release has been downloaded,
//! extracted and found to have the expected layout. Between removal and the
//! end of the transplant the install location is missing or partial; there is
//! no rollback to the previous version.

use std::cell::Cell;
use std::path::PathBuf;

use hoist_fetch::{ArchiveSource, Fetcher, HttpClient};
use hoist_fs::{OsRename, Rename, TransplantOptions};
use hoist_platform::{Platform, UserDirs};
use tempfile::TempDir;
use tracing::{debug, error, info, warn};

use crate::config::InstallConfig;
use crate::data::{InstallContext, InstallReport, InstallState};
use crate::error::{InstallError, Result};
use crate::hooks::InstallHook;
use crate::release;

pub struct Installer<C: HttpClient> {
    config: InstallConfig,
    fetcher: Fetcher<C>,
    platform: Platform,
    dirs: UserDirs,
    renamer: Box<dyn Rename + Send + Sync>,
    hooks: Vec<Box<dyn InstallHook>>,
    state: Cell<InstallState>,
}

impl<C: HttpClient> Installer<C> {
    /// Installer for the running platform and user.
    pub fn new(config: InstallConfig, fetcher: Fetcher<C>) -> Self {
        Self {
            config,
            fetcher,
            platform: Platform::current(),
            dirs: UserDirs::from_env(),
            renamer: Box::new(OsRename),
            hooks: vec![],
            state: Cell::new(InstallState::default()),
        }
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn user_dirs(mut self, dirs: UserDirs) -> Self {
        self.dirs = dirs;
        self
    }

    /// Replace the rename primitive used by the transplant.
    pub fn renamer<R: Rename + Send + Sync + 'static>(mut self, renamer: R) -> Self {
        self.renamer = Box::new(renamer);
        self
    }

    pub fn hook<H: InstallHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    pub fn state(&self) -> InstallState {
        self.state.get()
    }

    /// Configured install root, else the per-OS default.
    pub fn install_location(&self) -> Result<PathBuf> {
        match &self.config.install_root {
            Some(root) => Ok(root.clone()),
            None => Ok(self
                .dirs
                .install_location(self.platform.os, &self.config.program)?),
        }
    }

    /// Pinned version, else the latest release tag.
    pub async fn resolve_version(&self) -> Result<String> {
        match &self.config.version {
            Some(version) => {
                info!(%version, "using pinned version");
                Ok(version.clone())
            }
            None => release::latest_version(&self.fetcher, &self.config).await,
        }
    }

    /// Run the whole transaction.
    pub async fn run(&self) -> Result<InstallReport> {
        match self.execute().await {
            Ok(report) => {
                self.transition(InstallState::Done);
                self.run_hooks(&report);
                Ok(report)
            }
            Err(e) => {
                self.transition(InstallState::Failed);
                error!(error = %e, "install failed");
                Err(e)
            }
        }
    }

    async fn execute(&self) -> Result<InstallReport> {
        self.config.validate()?;

        self.transition(InstallState::ResolvingVersion);
        let install_root = self.install_location()?;
        let version = self.resolve_version().await?;
        let release_name = self.platform.release_name(&self.config.program, &version)?;
        let url = self.config.download_url(&version, &self.platform)?;

        self.transition(InstallState::Downloading);
        let source = ArchiveSource::new(url)?;
        let scratch = self.create_scratch()?;
        info!(%source, "downloading");
        let archive = self.fetcher.fetch(&source).await?;

        self.transition(InstallState::Extracting);
        let archive_report = self.fetcher.extract(&archive, scratch.path())?;
        drop(archive);

        let extracted = scratch.path().join(&release_name);
        if !extracted.is_dir() {
            return Err(InstallError::LayoutMismatch {
                expected: release_name,
            });
        }

        self.transition(InstallState::RemovingOldInstall);
        if hoist_fs::remove_if_exists(&install_root).map_err(InstallError::Transplant)? {
            info!(path = %install_root.display(), "removed previous install");
        }

        self.transition(InstallState::Transplanting);
        let transplanted = hoist_fs::transplant_with(
            &extracted,
            &install_root,
            TransplantOptions::new().overwrite(true),
            self.renamer.as_ref(),
        )
        .map_err(InstallError::Transplant)?;
        info!(path = %install_root.display(), %transplanted, "installed");

        self.transition(InstallState::CleaningUp);
        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!(path = %scratch_path.display(), error = %e, "failed to remove scratch directory");
        }

        Ok(InstallReport {
            version,
            release_name,
            install_root,
            transplanted,
            archive: archive_report,
        })
    }

    fn create_scratch(&self) -> Result<TempDir> {
        let parent = self
            .config
            .scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let scratch_error = |e| InstallError::Scratch {
            path: parent.clone(),
            source: e,
        };

        std::fs::create_dir_all(&parent).map_err(scratch_error)?;
        let scratch = tempfile::Builder::new()
            .prefix("hoist-scratch-")
            .tempdir_in(&parent)
            .map_err(scratch_error)?;
        debug!(path = %scratch.path().display(), "created scratch directory");
        Ok(scratch)
    }

    fn run_hooks(&self, report: &InstallReport) {
        let ctx = InstallContext {
            program: &self.config.program,
            version: &report.version,
            install_root: &report.install_root,
            platform: &self.platform,
        };
        for hook in &self.hooks {
            if let Err(e) = hook.post_install(&ctx) {
                warn!(hook = hook.name(), error = %e, "post-install hook failed");
            }
        }
    }

    fn transition(&self, next: InstallState) {
        debug!(from = %self.state.get(), to = %next, "state transition");
        self.state.set(next);
        if !next.is_terminal() {
            info!(state = %next, "install stage");
        }
    }
}
