use std::fmt;

use crate::Error;

/// Container format of a release archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Gzip-compressed tape archive (`.tar.gz`, `.tgz`).
    GzipTar,
    /// Zip archive, read through its central directory.
    Zip,
}

impl ArchiveFormat {
    /// Infer the format from a file name or URL path.
    ///
    /// Only the extension is inspected; the content is never sniffed.
    pub fn from_file_name(name: &str) -> Result<Self, Error> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            Ok(Self::Zip)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") || lower.ends_with(".gz")
        {
            Ok(Self::GzipTar)
        } else {
            Err(Error::UnsupportedFormat {
                name: name.to_string(),
            })
        }
    }

    /// Canonical file extension, including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::GzipTar => ".tar.gz",
            Self::Zip => ".zip",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GzipTar => write!(f, "tar.gz"),
            Self::Zip => write!(f, "zip"),
        }
    }
}
