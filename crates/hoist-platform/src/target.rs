use crate::arch::Arch;
use crate::error::Result;
use crate::os::Os;

/// The OS/architecture pair a release is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    pub fn current() -> Self {
        Self::new(Os::current(), Arch::current())
    }

    /// `<arch>-<suffix>`, e.g. `x86_64-unknown-linux-musl`.
    pub fn target_triple(&self) -> Result<String> {
        Ok(format!("{}-{}", self.arch, self.os.target_suffix()?))
    }

    /// Name of the top-level directory inside a release archive.
    pub fn release_name(&self, program: &str, version: &str) -> Result<String> {
        Ok(format!("{program}-{version}-{}", self.target_triple()?))
    }

    /// File name of the release archive.
    pub fn asset_name(&self, program: &str, version: &str) -> Result<String> {
        Ok(format!(
            "{}{}",
            self.release_name(program, version)?,
            self.os.archive_extension()
        ))
    }
}
