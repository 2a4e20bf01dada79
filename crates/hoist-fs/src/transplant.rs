//! Move a directory tree, atomically when the filesystem allows it.
//!
//! [`transplant`] first tries a single `rename`. When that fails (typically
//! `EXDEV`, source and destination on different volumes) it falls back to a
//! recursive copy-then-delete. Callers observe the same postcondition either
//! way: the destination holds the former source tree with matching
//! permissions and the source is gone.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::permissions::{apply_mode, mode_of};
use crate::{Error, Result, remove_path, symlink};

/// The rename step of a transplant.
///
/// Production code uses [`OsRename`]; tests substitute an implementation that
/// always fails to exercise the copy fallback.
pub trait Rename {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// `std::fs::rename`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRename;

impl Rename for OsRename {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TransplantOptions {
    overwrite: bool,
}

impl TransplantOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace an existing destination instead of failing.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn is_overwrite(&self) -> bool {
        self.overwrite
    }
}

/// How a transplant was carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transplanted {
    /// A single atomic rename.
    Renamed,
    /// Recursive copy followed by deletion of the source.
    Copied,
}

impl std::fmt::Display for Transplanted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Renamed => write!(f, "renamed"),
            Self::Copied => write!(f, "copied"),
        }
    }
}

/// Move the directory `src` to `dest`.
pub fn transplant(
    src: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: TransplantOptions,
) -> Result<Transplanted> {
    transplant_with(src.as_ref(), dest.as_ref(), options, &OsRename)
}

/// [`transplant`] with an explicit rename implementation.
pub fn transplant_with<R: Rename + ?Sized>(
    src: &Path,
    dest: &Path,
    options: TransplantOptions,
    renamer: &R,
) -> Result<Transplanted> {
    match fs::symlink_metadata(src) {
        Ok(meta) if meta.is_dir() => {}
        _ => {
            return Err(Error::NotADirectory {
                path: src.to_path_buf(),
            });
        }
    }

    if fs::symlink_metadata(dest).is_ok() {
        if !options.is_overwrite() {
            return Err(Error::DestinationExists {
                path: dest.to_path_buf(),
            });
        }
        debug!(dest = %dest.display(), "removing existing destination");
        remove_path(dest)?;
    }

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    match renamer.rename(src, dest) {
        Ok(()) => {
            debug!(src = %src.display(), dest = %dest.display(), "renamed directory");
            Ok(Transplanted::Renamed)
        }
        Err(e) => {
            warn!(
                src = %src.display(),
                dest = %dest.display(),
                error = %e,
                "rename failed, copying contents instead"
            );
            move_contents(src, dest, renamer)?;
            Ok(Transplanted::Copied)
        }
    }
}

fn move_contents<R: Rename + ?Sized>(src: &Path, dest: &Path, renamer: &R) -> Result<()> {
    let src_mode = fs::metadata(src)
        .map_err(|e| Error::Read {
            path: src.to_path_buf(),
            source: e,
        })
        .map(|meta| mode_of(&meta))?;

    fs::create_dir_all(dest).map_err(|e| Error::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let entries = fs::read_dir(src).map_err(|e| Error::Read {
        path: src.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::Read {
            path: src.to_path_buf(),
            source: e,
        })?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| Error::Read {
            path: src_path.clone(),
            source: e,
        })?;

        if file_type.is_dir() {
            transplant_with(
                &src_path,
                &dest_path,
                TransplantOptions::new().overwrite(true),
                renamer,
            )?;
        } else if file_type.is_symlink() {
            symlink::copy_symlink(&src_path, &dest_path)?;
            remove_path(&src_path)?;
        } else {
            move_file(&src_path, &dest_path)?;
        }
    }

    fs::remove_dir_all(src).map_err(|e| Error::Remove {
        path: src.to_path_buf(),
        source: e,
    })?;

    if let Some(mode) = src_mode {
        apply_mode(dest, mode)?;
    }
    Ok(())
}

fn move_file(src: &Path, dest: &Path) -> Result<()> {
    let read_err = |e| Error::Read {
        path: src.to_path_buf(),
        source: e,
    };
    let write_err = |e| Error::Write {
        path: dest.to_path_buf(),
        source: e,
    };

    let mut reader = File::open(src).map_err(read_err)?;
    let mode = reader.metadata().map(|meta| mode_of(&meta)).map_err(read_err)?;
    {
        let mut writer = File::create(dest).map_err(write_err)?;
        io::copy(&mut reader, &mut writer).map_err(write_err)?;
    }
    if let Some(mode) = mode {
        apply_mode(dest, mode)?;
    }

    fs::remove_file(src).map_err(|e| Error::Remove {
        path: src.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Fails every rename, as a move across volumes would.
    struct CrossDevice;

    impl Rename for CrossDevice {
        fn rename(&self, _from: &Path, _to: &Path) -> io::Result<()> {
            Err(io::Error::other("simulated cross-device link"))
        }
    }

    fn populate(root: &Path) {
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::create_dir_all(root.join("share/doc")).unwrap();
        fs::write(root.join("bin/tool"), b"\x7fELF tool").unwrap();
        fs::write(root.join("share/doc/README"), b"read me").unwrap();
        fs::write(root.join("tool.bat"), b"@echo off").unwrap();
        #[cfg(unix)]
        {
            apply_mode(&root.join("bin/tool"), 0o755).unwrap();
            apply_mode(&root.join("share/doc/README"), 0o640).unwrap();
            apply_mode(&root.join("share"), 0o750).unwrap();
        }
    }

    /// Relative path -> (contents for files, mode).
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, (Option<Vec<u8>>, Option<u32>)> {
        fn walk(
            root: &Path,
            dir: &Path,
            out: &mut BTreeMap<PathBuf, (Option<Vec<u8>>, Option<u32>)>,
        ) {
            for entry in fs::read_dir(dir).unwrap() {
                let entry = entry.unwrap();
                let path = entry.path();
                let meta = fs::metadata(&path).unwrap();
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                if meta.is_dir() {
                    out.insert(rel, (None, mode_of(&meta)));
                    walk(root, &path, out);
                } else {
                    out.insert(rel, (Some(fs::read(&path).unwrap()), mode_of(&meta)));
                }
            }
        }
        let mut out = BTreeMap::new();
        walk(root, root, &mut out);
        out
    }

    #[test]
    fn same_filesystem_renames() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        populate(&src);
        let before = snapshot(&src);

        let how = transplant(&src, &dest, TransplantOptions::new()).unwrap();

        assert_eq!(how, Transplanted::Renamed);
        assert!(!src.exists());
        assert_eq!(snapshot(&dest), before);
    }

    #[test]
    fn failed_rename_falls_back_to_copy() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        populate(&src);
        let before = snapshot(&src);

        let how =
            transplant_with(&src, &dest, TransplantOptions::new(), &CrossDevice).unwrap();

        assert_eq!(how, Transplanted::Copied);
        assert!(!src.exists());
        assert_eq!(snapshot(&dest), before);
    }

    #[cfg(unix)]
    #[test]
    fn copy_fallback_preserves_directory_mode() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("f"), b"x").unwrap();
        apply_mode(&src, 0o700).unwrap();

        transplant_with(&src, &dest, TransplantOptions::new(), &CrossDevice).unwrap();

        assert_eq!(mode_of(&fs::metadata(&dest).unwrap()), Some(0o700));
    }

    #[cfg(unix)]
    #[test]
    fn copy_fallback_recreates_symlinks() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("libfoo.so.1"), b"lib").unwrap();
        symlink::create_symlink("libfoo.so.1", src.join("libfoo.so")).unwrap();

        transplant_with(&src, &dest, TransplantOptions::new(), &CrossDevice).unwrap();

        assert_eq!(
            fs::read_link(dest.join("libfoo.so")).unwrap(),
            Path::new("libfoo.so.1")
        );
        assert_eq!(fs::read(dest.join("libfoo.so")).unwrap(), b"lib");
    }

    #[test]
    fn existing_destination_without_overwrite_is_untouched() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        populate(&src);
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("keep.txt"), b"old install").unwrap();
        let src_before = snapshot(&src);
        let dest_before = snapshot(&dest);

        let result = transplant(&src, &dest, TransplantOptions::new().overwrite(false));

        assert!(matches!(result, Err(Error::DestinationExists { .. })));
        assert_eq!(snapshot(&src), src_before);
        assert_eq!(snapshot(&dest), dest_before);
    }

    #[test]
    fn overwrite_replaces_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        populate(&src);
        fs::create_dir_all(dest.join("stale")).unwrap();
        fs::write(dest.join("stale/old.txt"), b"old").unwrap();

        transplant(&src, &dest, TransplantOptions::new().overwrite(true)).unwrap();

        assert!(!dest.join("stale").exists());
        assert!(dest.join("bin/tool").is_file());
    }

    #[test]
    fn overwrite_replaces_destination_on_copy_path() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        populate(&src);
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("old.txt"), b"old").unwrap();

        let how = transplant_with(
            &src,
            &dest,
            TransplantOptions::new().overwrite(true),
            &CrossDevice,
        )
        .unwrap();

        assert_eq!(how, Transplanted::Copied);
        assert!(!dest.join("old.txt").exists());
        assert_eq!(fs::read(dest.join("tool.bat")).unwrap(), b"@echo off");
    }

    #[test]
    fn source_must_be_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, b"not a dir").unwrap();

        let result = transplant(&file, dir.path().join("dest"), TransplantOptions::new());
        assert!(matches!(result, Err(Error::NotADirectory { .. })));

        let result = transplant(
            dir.path().join("missing"),
            dir.path().join("dest"),
            TransplantOptions::new(),
        );
        assert!(matches!(result, Err(Error::NotADirectory { .. })));
    }

    #[test]
    fn missing_destination_parents_are_created() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("a/b/c/dest");
        populate(&src);

        transplant(&src, &dest, TransplantOptions::new()).unwrap();
        assert!(dest.join("share/doc/README").is_file());
    }
}
