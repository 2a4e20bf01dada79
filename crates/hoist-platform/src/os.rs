//! Operating system detection.

use std::fmt;

use crate::error::{Error, Result};

/// Operating systems with a known release layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Macos,
    Windows,
    /// Anything else, by its `std::env::consts::OS` name.
    Other(&'static str),
}

impl Os {
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    pub fn from_name(name: &'static str) -> Self {
        match name {
            "linux" => Os::Linux,
            "macos" | "darwin" => Os::Macos,
            "windows" => Os::Windows,
            other => Os::Other(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Macos => "macos",
            Os::Windows => "windows",
            Os::Other(name) => name,
        }
    }

    /// Vendor/OS/ABI part of the release target triple.
    ///
    /// Linux always gets the static musl build.
    pub fn target_suffix(self) -> Result<&'static str> {
        match self {
            Os::Linux => Ok("unknown-linux-musl"),
            Os::Macos => Ok("apple-darwin"),
            Os::Windows => Ok("pc-windows-msvc"),
            Os::Other(name) => Err(Error::UnsupportedPlatform {
                os: name.to_string(),
            }),
        }
    }

    /// Release archive extension, including the leading dot.
    pub fn archive_extension(self) -> &'static str {
        match self {
            Os::Windows => ".zip",
            _ => ".tar.gz",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
