//! Entry path sanitization (zip-slip prevention).
//!
//! Paths are resolved lexically. Absolute paths and `..` components that climb
//! above the destination root are rejected instead of being clamped.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: PathBuf,
    /// Normalized path relative to the destination root.
    pub relative: PathBuf,
    /// `base` joined with `relative`.
    pub resolved: PathBuf,
}

/// Resolve `entry_path` under `base`, rejecting anything that escapes it.
pub fn sanitize_path(entry_path: impl AsRef<Path>, base: impl AsRef<Path>) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();
    if entry_path.as_os_str().as_encoded_bytes().contains(&0) {
        return Err(Error::InvalidPath);
    }

    let relative = normalize_relative(entry_path, PathBuf::new()).ok_or_else(|| {
        Error::PathTraversal {
            entry: entry_path.to_path_buf(),
        }
    })?;

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved: base.as_ref().join(&relative),
        relative,
    })
}

/// Check a symlink target against the destination root.
///
/// `link` is the symlink's own path relative to the root. Returns the
/// root-relative path the link points at.
pub fn sanitize_symlink_target(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<PathBuf> {
    let target = target.as_ref();
    let link = link.as_ref();

    if target.has_root() || target.is_absolute() {
        return Err(Error::AbsoluteSymlinkTarget {
            link: link.to_path_buf(),
            target: target.to_path_buf(),
        });
    }

    let start = link.parent().map(Path::to_path_buf).unwrap_or_default();
    normalize_relative(target, start).ok_or_else(|| Error::SymlinkEscape {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
    })
}

/// Apply `path`'s components on top of `start`. `None` if the result would
/// leave the root or `path` is absolute.
fn normalize_relative(path: &Path, start: PathBuf) -> Option<PathBuf> {
    let mut result = start;
    for component in path.components() {
        match component {
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(result)
}
