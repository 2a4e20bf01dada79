use std::path::Path;

use crate::{Error, Result};

/// Create a symlink at `link` pointing to `target`.
#[cfg(unix)]
pub fn create_symlink(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    let link = link.as_ref();
    std::os::unix::fs::symlink(target.as_ref(), link).map_err(|e| Error::Write {
        path: link.to_path_buf(),
        source: e,
    })
}

#[cfg(windows)]
pub fn create_symlink(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    let target = target.as_ref();
    let link = link.as_ref();
    let result = if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };
    result.map_err(|e| Error::Write {
        path: link.to_path_buf(),
        source: e,
    })
}

#[cfg(not(any(unix, windows)))]
pub fn create_symlink(_target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    Err(Error::SymlinkNotSupported {
        path: link.as_ref().to_path_buf(),
    })
}

/// Point `link` at `target`, removing whatever file or link was there before.
///
/// A directory at `link` is not removed.
pub fn replace_symlink(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    let link = link.as_ref();
    if let Ok(meta) = std::fs::symlink_metadata(link) {
        if meta.is_dir() {
            return Err(Error::DestinationExists {
                path: link.to_path_buf(),
            });
        }
        tracing::debug!(link = %link.display(), "removing previous link");
        std::fs::remove_file(link).map_err(|e| Error::Remove {
            path: link.to_path_buf(),
            source: e,
        })?;
    }
    create_symlink(target, link)
}

/// Recreate the symlink at `src` as `dest`, keeping its target verbatim.
pub fn copy_symlink(src: &Path, dest: &Path) -> Result<()> {
    let target = std::fs::read_link(src).map_err(|e| Error::Read {
        path: src.to_path_buf(),
        source: e,
    })?;
    create_symlink(target, dest)
}
