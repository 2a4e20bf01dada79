//! Archive extraction for gzip-tar and zip.
//!
//! Both container formats are exposed through [`EntrySource`], which hands
//! `(metadata, content stream)` pairs to a single extraction loop. Tar is read
//! sequentially through a gzip decoder; zip is walked by central-directory
//! index. Dispatch happens on the [`ArchiveFormat`] tag only.
//!
//! # Platform Behavior
//!
//! **Unix**: permission bits from the archive are applied (masked to `0o777`),
//! symlinks are recreated when their target stays inside the destination.
//!
//! **Windows**: permission bits are ignored and symlink entries are skipped.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use hoist_fs::permissions::apply_mode;
use tracing::{debug, warn};

use crate::entry::{ArchiveReport, Entry, EntryKind};
use crate::error::{Error, Result};
use crate::format::ArchiveFormat;
use crate::sanitize::{sanitize_path, sanitize_symlink_target};

mod tar;
mod zip;

pub use self::tar::TarSource;
pub use self::zip::ZipSource;

/// An entry read from an archive but not yet written.
pub struct PendingEntry<'a> {
    pub path: PathBuf,
    pub mode: Option<u32>,
    pub kind: PendingKind<'a>,
}

pub enum PendingKind<'a> {
    Directory,
    File(&'a mut dyn Read),
    Symlink { target: PathBuf },
    /// Anything else; carries a short description for logging.
    Unsupported(String),
}

/// Archive-specific entry source.
///
/// Entry readers borrow the underlying decoder, so entries are handed to a
/// visitor one at a time instead of being returned from an iterator.
pub trait EntrySource {
    fn format(&self) -> ArchiveFormat;

    fn for_each_entry(
        &mut self,
        visit: &mut dyn FnMut(PendingEntry<'_>) -> Result<()>,
    ) -> Result<()>;
}

/// Extract the archive file at `archive` into `destination`.
pub fn extract(archive: &Path, format: ArchiveFormat, destination: &Path) -> Result<ArchiveReport> {
    let file = File::open(archive).map_err(|e| Error::Open {
        path: archive.to_path_buf(),
        source: e,
    })?;
    debug!(archive = %archive.display(), %format, "extracting");
    extract_from_reader(BufReader::new(file), format, destination)
}

/// Extract an archive read from `reader` into `destination`.
pub fn extract_from_reader<R: Read + Seek>(
    reader: R,
    format: ArchiveFormat,
    destination: &Path,
) -> Result<ArchiveReport> {
    match format {
        ArchiveFormat::GzipTar => extract_with_source(&mut TarSource::new(reader), destination),
        ArchiveFormat::Zip => extract_with_source(&mut ZipSource::new(reader)?, destination),
    }
}

/// Main extraction loop.
///
/// The destination is created before the first entry is read. Directory
/// permissions are applied last, deepest first, so read-only directories do
/// not block writes to their children. Entries written before a failure are
/// left in place.
pub fn extract_with_source<S: EntrySource + ?Sized>(
    source: &mut S,
    destination: &Path,
) -> Result<ArchiveReport> {
    ensure_directory(destination)?;
    let root = destination.canonicalize().map_err(|e| Error::DirectoryCreationFailed {
        path: destination.to_path_buf(),
        source: e,
    })?;

    let mut report = ArchiveReport::new(source.format());
    let mut directory_modes: Vec<(PathBuf, u32)> = Vec::new();

    source.for_each_entry(&mut |pending| {
        let sanitized = sanitize_path(&pending.path, destination)?;
        let target = sanitized.resolved;
        let parent = sanitized.relative.parent().unwrap_or(Path::new(""));

        let (kind, size) = match pending.kind {
            PendingKind::Directory => {
                check_links(&root, &sanitized.relative)?;
                ensure_directory(&target)?;
                if let Some(mode) = pending.mode {
                    directory_modes.push((target.clone(), mode));
                }
                (EntryKind::Directory, 0)
            }
            PendingKind::File(reader) => {
                check_links(&root, parent)?;
                let written = write_file(reader, &target)?;
                if let Some(mode) = pending.mode {
                    apply_mode(&target, mode)?;
                }
                (EntryKind::File, written)
            }
            PendingKind::Symlink { target: link_target } => {
                sanitize_symlink_target(&link_target, &sanitized.relative)?;
                check_links(&root, parent)?;
                if !write_symlink(&link_target, &target, &root)? {
                    report.skipped += 1;
                    return Ok(());
                }
                (EntryKind::Symlink { target: link_target }, 0)
            }
            PendingKind::Unsupported(description) => {
                warn!(entry = %pending.path.display(), kind = %description, "skipping unsupported entry");
                report.skipped += 1;
                return Ok(());
            }
        };

        report.total_bytes += size;
        report.entries.push(Entry {
            original_path: pending.path,
            target_path: target,
            size,
            mode: pending.mode,
            kind,
        });
        Ok(())
    })?;

    directory_modes.sort_by_key(|(path, _)| std::cmp::Reverse(path.components().count()));
    for (path, mode) in &directory_modes {
        apply_mode(path, *mode)?;
    }

    debug!(
        entries = report.entry_count(),
        bytes = report.total_bytes,
        skipped = report.skipped,
        "extraction finished"
    );
    Ok(report)
}

fn ensure_directory(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Walk `relative` under `root` and reject any existing symlink on the way
/// that resolves outside `root`.
///
/// Each link's target is checked when it is written, but a chain of links can
/// still lead out once earlier links are followed on disk.
fn check_links(root: &Path, relative: &Path) -> Result<()> {
    let mut current = root.to_path_buf();
    for component in relative.components() {
        current.push(component);
        let Ok(meta) = std::fs::symlink_metadata(&current) else {
            break;
        };
        if !meta.is_symlink() {
            continue;
        }
        let inside = current.canonicalize().is_ok_and(|real| real.starts_with(root));
        if !inside {
            return Err(Error::SymlinkEscape {
                target: std::fs::read_link(&current).unwrap_or_default(),
                link: current,
            });
        }
    }
    Ok(())
}

fn write_file(reader: &mut dyn Read, target: &Path) -> Result<u64> {
    if let Some(parent) = target.parent() {
        ensure_directory(parent)?;
    }
    // never write through a link left by an earlier entry
    if std::fs::symlink_metadata(target).is_ok_and(|meta| meta.is_symlink()) {
        hoist_fs::remove_path(target)?;
    }

    let extraction_failed = |e: io::Error| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    };
    let mut file = File::create(target).map_err(extraction_failed)?;
    io::copy(reader, &mut file).map_err(extraction_failed)
}

/// Returns `false` when symlinks are not reproduced on this platform.
#[cfg(unix)]
fn write_symlink(link_target: &Path, link: &Path, root: &Path) -> Result<bool> {
    if let Some(parent) = link.parent() {
        ensure_directory(parent)?;
        // judge the target from where the link really lands, not its archive path
        let escape = || Error::SymlinkEscape {
            link: link.to_path_buf(),
            target: link_target.to_path_buf(),
        };
        let real_parent = parent.canonicalize().map_err(|_| escape())?;
        let within = real_parent.strip_prefix(root).map_err(|_| escape())?;
        sanitize_symlink_target(link_target, within.join(link.file_name().unwrap_or_default()))?;
    }
    hoist_fs::symlink::replace_symlink(link_target, link)?;
    Ok(true)
}

#[cfg(not(unix))]
fn write_symlink(link_target: &Path, link: &Path, _root: &Path) -> Result<bool> {
    warn!(
        link = %link.display(),
        target = %link_target.display(),
        "skipping symlink entry on this platform"
    );
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    /// In-memory source used to drive the loop without a container format.
    struct FakeSource {
        entries: Vec<(&'static str, Option<u32>, FakeKind)>,
    }

    enum FakeKind {
        Dir,
        File(&'static [u8]),
        Link(&'static str),
        Fifo,
    }

    impl EntrySource for FakeSource {
        fn format(&self) -> ArchiveFormat {
            ArchiveFormat::GzipTar
        }

        fn for_each_entry(
            &mut self,
            visit: &mut dyn FnMut(PendingEntry<'_>) -> Result<()>,
        ) -> Result<()> {
            for (path, mode, kind) in &self.entries {
                let mut content;
                let kind = match kind {
                    FakeKind::Dir => PendingKind::Directory,
                    FakeKind::File(bytes) => {
                        content = Cursor::new(*bytes);
                        PendingKind::File(&mut content)
                    }
                    FakeKind::Link(target) => PendingKind::Symlink {
                        target: PathBuf::from(target),
                    },
                    FakeKind::Fifo => PendingKind::Unsupported("fifo".into()),
                };
                visit(PendingEntry {
                    path: PathBuf::from(path),
                    mode: *mode,
                    kind,
                })?;
            }
            Ok(())
        }
    }

    #[test]
    fn files_before_their_directories() {
        let dir = tempdir().unwrap();
        let mut source = FakeSource {
            entries: vec![
                ("pkg/bin/tool", Some(0o755), FakeKind::File(b"tool")),
                ("pkg/bin", Some(0o755), FakeKind::Dir),
            ],
        };

        let report = extract_with_source(&mut source, dir.path()).unwrap();

        assert_eq!(report.entry_count(), 2);
        assert_eq!(report.total_bytes, 4);
        assert_eq!(std::fs::read(dir.path().join("pkg/bin/tool")).unwrap(), b"tool");
    }

    #[test]
    fn unsupported_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let mut source = FakeSource {
            entries: vec![
                ("pkg/pipe", None, FakeKind::Fifo),
                ("pkg/data", None, FakeKind::File(b"d")),
            ],
        };

        let report = extract_with_source(&mut source, dir.path()).unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.entry_count(), 1);
        assert!(!dir.path().join("pkg/pipe").exists());
    }

    #[test]
    fn traversal_aborts_extraction() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        let mut source = FakeSource {
            entries: vec![
                ("pkg/ok", None, FakeKind::File(b"ok")),
                ("../escaped", None, FakeKind::File(b"bad")),
            ],
        };

        let result = extract_with_source(&mut source, &dest);

        assert!(matches!(result, Err(Error::PathTraversal { .. })));
        assert!(dest.join("pkg/ok").exists());
        assert!(!dir.path().join("escaped").exists());
    }

    #[test]
    fn escaping_symlink_is_rejected() {
        let dir = tempdir().unwrap();
        let mut source = FakeSource {
            entries: vec![("pkg/link", None, FakeKind::Link("../../outside"))],
        };

        let result = extract_with_source(&mut source, dir.path());
        assert!(matches!(result, Err(Error::SymlinkEscape { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn read_only_directory_still_receives_children() {
        use hoist_fs::permissions::mode_of;

        let dir = tempdir().unwrap();
        let mut source = FakeSource {
            entries: vec![
                ("pkg/share", Some(0o555), FakeKind::Dir),
                ("pkg/share/doc.txt", Some(0o444), FakeKind::File(b"doc")),
            ],
        };

        extract_with_source(&mut source, dir.path()).unwrap();

        let share = dir.path().join("pkg/share");
        assert_eq!(mode_of(&std::fs::metadata(&share).unwrap()), Some(0o555));
        assert_eq!(std::fs::read(share.join("doc.txt")).unwrap(), b"doc");
        hoist_fs::permissions::apply_mode(&share, 0o755).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn file_entry_replaces_earlier_symlink() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&dest).unwrap();
        let mut source = FakeSource {
            entries: vec![
                ("pkg/target.txt", None, FakeKind::File(b"target")),
                ("pkg/link", None, FakeKind::Link("target.txt")),
                ("pkg/link", None, FakeKind::File(b"replaced")),
            ],
        };

        extract_with_source(&mut source, &dest).unwrap();

        assert_eq!(std::fs::read(dest.join("pkg/target.txt")).unwrap(), b"target");
        assert_eq!(std::fs::read(dest.join("pkg/link")).unwrap(), b"replaced");
        assert!(!std::fs::symlink_metadata(dest.join("pkg/link")).unwrap().is_symlink());
    }
}
