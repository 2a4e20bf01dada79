use std::fmt;
use std::path::{Path, PathBuf};

use hoist_archive::ArchiveReport;
use hoist_fs::Transplanted;
use hoist_platform::Platform;

/// Stages of an install transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallState {
    #[default]
    ResolvingVersion,
    Downloading,
    Extracting,
    RemovingOldInstall,
    Transplanting,
    CleaningUp,
    Done,
    Failed,
}

impl InstallState {
    pub fn is_terminal(self) -> bool {
        matches!(self, InstallState::Done | InstallState::Failed)
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallState::ResolvingVersion => "resolving version",
            InstallState::Downloading => "downloading",
            InstallState::Extracting => "extracting",
            InstallState::RemovingOldInstall => "removing old install",
            InstallState::Transplanting => "transplanting",
            InstallState::CleaningUp => "cleaning up",
            InstallState::Done => "done",
            InstallState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What hooks get to see once the program is in place.
#[derive(Debug, Clone, Copy)]
pub struct InstallContext<'a> {
    pub program: &'a str,
    pub version: &'a str,
    pub install_root: &'a Path,
    pub platform: &'a Platform,
}

/// Outcome of a successful install.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub version: String,
    /// Top-level directory name of the release archive.
    pub release_name: String,
    pub install_root: PathBuf,
    pub transplanted: Transplanted,
    pub archive: ArchiveReport,
}
