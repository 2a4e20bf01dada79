use std::fmt;

use hoist_archive::ArchiveFormat;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{Error, Result};

/// Where a release archive lives and how it is packed.
///
/// The format comes from the decoded last segment of the URL path, so an
/// unsupported extension is rejected here, before any network or file I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSource {
    url: Url,
    file_name: String,
    format: ArchiveFormat,
}

impl ArchiveSource {
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        let raw = url.as_ref();
        let url = Url::parse(raw).map_err(|source| Error::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(|name| percent_decode_str(name).decode_utf8_lossy().into_owned())
            .ok_or_else(|| Error::MissingFileName {
                url: raw.to_string(),
            })?;
        let format = ArchiveFormat::from_file_name(&file_name).map_err(Error::Format)?;
        Ok(Self {
            url,
            file_name,
            format,
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Last path segment of the URL, percent-decoded.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl fmt::Display for ArchiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.format)
    }
}
