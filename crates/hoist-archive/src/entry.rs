use std::path::{Path, PathBuf};

use crate::format::ArchiveFormat;

/// An archive entry as written to disk.
#[derive(Clone, Debug)]
pub struct Entry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
    pub mode: Option<u32>,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    pub fn symlink_target(&self) -> Option<&Path> {
        match &self.kind {
            EntryKind::Symlink { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_executable(&self) -> bool {
        self.mode.is_some_and(hoist_fs::permissions::is_executable)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink { target: PathBuf },
}

/// Summary of one extraction.
#[derive(Clone, Debug)]
pub struct ArchiveReport {
    pub format: ArchiveFormat,
    pub total_bytes: u64,
    pub entries: Vec<Entry>,
    /// Entries of a kind that is not reproduced (hard links, devices, ...).
    pub skipped: usize,
}

impl ArchiveReport {
    pub fn new(format: ArchiveFormat) -> Self {
        Self {
            format,
            total_bytes: 0,
            entries: Vec::new(),
            skipped: 0,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Names of the distinct first path components, in archive order.
    pub fn top_level_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in &self.entries {
            let first = entry
                .original_path
                .components()
                .find_map(|c| match c {
                    std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                });
            if let Some(first) = first
                && !names.contains(&first)
            {
                names.push(first);
            }
        }
        names
    }
}
