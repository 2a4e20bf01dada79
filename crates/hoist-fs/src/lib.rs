//! Filesystem primitives for the install transaction.
//!
//! - `transplant` - rename-or-copy directory moves
//! - `permissions` - Unix mode bit helpers
//! - `symlink` - link creation and replacement

mod error;
pub mod permissions;
pub mod symlink;
pub mod transplant;

pub use error::{Error, Result};
pub use transplant::{OsRename, Rename, TransplantOptions, Transplanted, transplant, transplant_with};

use std::path::Path;

/// Remove a file, symlink or directory tree at `path`.
pub fn remove_path(path: &Path) -> Result<()> {
    let meta = std::fs::symlink_metadata(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| Error::Remove {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Remove `path` if it exists. Returns whether anything was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => remove_path(path).map(|()| true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
