//! Unix mode bit helpers.
//!
//! On non-Unix platforms mode bits are not representable, so [`mode_of`]
//! returns `None` and [`apply_mode`] is a no-op.

use std::fs::Metadata;
use std::path::Path;

use crate::{Error, Result};

/// Permission bits carried over from archives and source trees.
///
/// Setuid, setgid and sticky bits are dropped.
pub const PERMISSION_MASK: u32 = 0o777;

/// Read the permission bits of `metadata`, masked with [`PERMISSION_MASK`].
#[cfg(unix)]
pub fn mode_of(metadata: &Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & PERMISSION_MASK)
}

#[cfg(not(unix))]
pub fn mode_of(_metadata: &Metadata) -> Option<u32> {
    None
}

/// Set the permission bits of `path` to `mode & PERMISSION_MASK`.
#[cfg(unix)]
pub fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(mode & PERMISSION_MASK);
    std::fs::set_permissions(path, perms).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(not(unix))]
pub fn apply_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Check if mode bits allow execution by anyone.
pub fn is_executable(mode: u32) -> bool {
    mode & 0o111 != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn executable_bits() {
        assert!(is_executable(0o755));
        assert!(is_executable(0o100));
        assert!(!is_executable(0o644));
    }

    #[cfg(unix)]
    #[test]
    fn apply_then_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tool");
        std::fs::write(&path, b"#!/bin/sh\n").unwrap();

        apply_mode(&path, 0o750).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(mode_of(&meta), Some(0o750));
    }

    #[cfg(unix)]
    #[test]
    fn apply_masks_special_bits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tool");
        std::fs::write(&path, b"").unwrap();

        apply_mode(&path, 0o104755).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(mode_of(&meta), Some(0o755));
    }

    #[test]
    fn apply_to_missing_path_fails_on_unix() {
        let dir = tempdir().unwrap();
        let result = apply_mode(&dir.path().join("missing"), 0o644);
        if cfg!(unix) {
            assert!(matches!(result, Err(Error::Write { .. })));
        } else {
            assert!(result.is_ok());
        }
    }
}
