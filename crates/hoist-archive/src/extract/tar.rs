use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};
use crate::extract::{EntrySource, PendingEntry, PendingKind};
use crate::format::ArchiveFormat;

/// Sequential reader over a gzip-compressed tar stream.
pub struct TarSource<R: Read> {
    archive: tar::Archive<GzDecoder<R>>,
}

impl<R: Read> TarSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            archive: tar::Archive::new(GzDecoder::new(reader)),
        }
    }
}

impl<R: Read> EntrySource for TarSource<R> {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::GzipTar
    }

    fn for_each_entry(
        &mut self,
        visit: &mut dyn FnMut(PendingEntry<'_>) -> Result<()>,
    ) -> Result<()> {
        // A bad gzip header or tar block surfaces on the first read.
        let corrupted = |e: std::io::Error| Error::Corrupted {
            reason: e.to_string(),
        };

        for entry in self.archive.entries().map_err(corrupted)? {
            let mut entry = entry.map_err(corrupted)?;

            let path = entry.path().map_err(|_| Error::InvalidPath)?.into_owned();
            let header = entry.header();
            let mode = header.mode().ok();
            let entry_type = header.entry_type();

            let kind = if entry_type.is_dir() {
                PendingKind::Directory
            } else if entry_type.is_file() {
                PendingKind::File(&mut entry)
            } else if entry_type.is_symlink() {
                match entry.link_name() {
                    Ok(Some(target)) => PendingKind::Symlink {
                        target: target.into_owned(),
                    },
                    _ => return Err(Error::InvalidPath),
                }
            } else {
                PendingKind::Unsupported(format!("{entry_type:?}"))
            };

            visit(PendingEntry { path, mode, kind })?;
        }
        Ok(())
    }
}
