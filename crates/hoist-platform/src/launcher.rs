//! Launch shortcuts for an installed program.
//!
//! **Unix**: `~/<program>` becomes a symlink to `<install>/<program>`.
//!
//! **Windows**: `<program>.lnk` shortcuts pointing at `<install>/<program>.bat`
//! are created on the Desktop and in the Start Menu by a generated VBScript
//! run through `wscript`.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::command::Command;
use crate::dir::UserDirs;
use crate::error::{Error, Result};
use crate::os::Os;

#[derive(Debug, Clone)]
pub struct Launcher {
    program: String,
    install_root: PathBuf,
}

impl Launcher {
    pub fn new(program: impl Into<String>, install_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            install_root: install_root.into(),
        }
    }

    /// The file the launcher points at.
    pub fn target(&self, os: Os) -> PathBuf {
        match os {
            Os::Windows => self.install_root.join(format!("{}.bat", self.program)),
            _ => self.install_root.join(&self.program),
        }
    }

    /// Create the launcher for `os`; returns the created link paths.
    pub fn create(&self, os: Os, dirs: &UserDirs) -> Result<Vec<PathBuf>> {
        match os {
            Os::Windows => self.create_shortcuts(dirs),
            Os::Linux | Os::Macos => Ok(vec![self.create_symlink(os, dirs.home()?)?]),
            Os::Other(name) => Err(Error::UnsupportedPlatform {
                os: name.to_string(),
            }),
        }
    }

    /// Replace `<home>/<program>` with a symlink to the installed binary.
    pub fn create_symlink(&self, os: Os, home: &Path) -> Result<PathBuf> {
        let link = home.join(&self.program);
        let target = self.target(os);
        hoist_fs::symlink::replace_symlink(&target, &link)?;
        info!(link = %link.display(), target = %target.display(), "created launcher symlink");
        Ok(link)
    }

    fn create_shortcuts(&self, dirs: &UserDirs) -> Result<Vec<PathBuf>> {
        let target = self.target(Os::Windows);
        let link_name = format!("{}.lnk", self.program);

        let mut created = Vec::new();
        let mut last_error = None;
        for folder in [dirs.desktop(), dirs.start_menu_programs()] {
            let result = folder.and_then(|folder| {
                let link = folder.join(&link_name);
                let script = shortcut_script(&link, &target, &self.install_root, &self.program);
                run_script(&script)?;
                Ok(link)
            });
            match result {
                Ok(link) => {
                    info!(link = %link.display(), "created shortcut");
                    created.push(link);
                }
                Err(e) => {
                    warn!(error = %e, "failed to create shortcut");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if created.is_empty() => Err(e),
            _ => Ok(created),
        }
    }
}

/// VBScript that saves a `.lnk` at `link` pointing at `target`.
pub fn shortcut_script(link: &Path, target: &Path, working_dir: &Path, description: &str) -> String {
    let quote = |value: &str| value.replace('"', "\"\"");
    let path = |p: &Path| quote(&p.to_string_lossy());

    let mut script = String::new();
    script.push_str("option explicit\n\n");
    script.push_str("sub CreateShortCut()\n");
    script.push_str("dim objShell, objLink\n");
    script.push_str("set objShell = CreateObject(\"WScript.Shell\")\n");
    script.push_str(&format!("set objLink = objShell.CreateShortcut(\"{}\")\n", path(link)));
    script.push_str(&format!("objLink.Description = \"{}\"\n", quote(description)));
    script.push_str(&format!("objLink.TargetPath = \"{}\"\n", path(target)));
    script.push_str("objLink.WindowStyle = 1\n");
    script.push_str(&format!("objLink.WorkingDirectory = \"{}\"\n", path(working_dir)));
    script.push_str("objLink.Save\nend sub\n\n");
    script.push_str("call CreateShortCut()\n");
    script
}

fn run_script(script: &str) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix("hoist-shortcut-")
        .suffix(".vbs")
        .tempfile()
        .map_err(|e| Error::Script {
            path: std::env::temp_dir(),
            source: e,
        })?;
    file.write_all(script.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| Error::Script {
            path: file.path().to_path_buf(),
            source: e,
        })?;

    Command::new("wscript").arg(file.path()).run()?;
    Ok(())
}
