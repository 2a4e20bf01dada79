use std::io::{Read, Seek};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::extract::{EntrySource, PendingEntry, PendingKind};
use crate::format::ArchiveFormat;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Zip archive walked by central-directory index.
pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).map_err(corrupted)?;
        Ok(Self { archive })
    }
}

fn corrupted(e: zip::result::ZipError) -> Error {
    Error::Corrupted {
        reason: e.to_string(),
    }
}

impl<R: Read + Seek> EntrySource for ZipSource<R> {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }

    fn for_each_entry(
        &mut self,
        visit: &mut dyn FnMut(PendingEntry<'_>) -> Result<()>,
    ) -> Result<()> {
        for index in 0..self.archive.len() {
            let mut file = self.archive.by_index(index).map_err(corrupted)?;

            // raw name; the extraction loop does the sanitizing
            let path = PathBuf::from(file.name());
            let mode = file.unix_mode();

            let kind = if file.is_dir() {
                PendingKind::Directory
            } else if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
                let mut target = String::new();
                file.read_to_string(&mut target)
                    .map_err(|_| Error::InvalidPath)?;
                PendingKind::Symlink {
                    target: PathBuf::from(target),
                }
            } else {
                PendingKind::File(&mut file)
            };

            visit(PendingEntry { path, mode, kind })?;
        }
        Ok(())
    }
}
