//! Architecture naming.

use std::fmt;

/// CPU architecture as it appears in release asset names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arch(String);

impl Arch {
    pub fn current() -> Self {
        Self::normalize(std::env::consts::ARCH)
    }

    /// Map Go/Debian style names to the Rust triple spelling; anything else
    /// passes through.
    pub fn normalize(raw: &str) -> Self {
        let name = match raw {
            "arm64" => "aarch64",
            "amd64" => "x86_64",
            other => other,
        };
        Arch(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(Arch::normalize("arm64").as_str(), "aarch64");
        assert_eq!(Arch::normalize("amd64").as_str(), "x86_64");
        assert_eq!(Arch::normalize("riscv64").as_str(), "riscv64");
        assert_eq!(Arch::normalize("x86_64").as_str(), "x86_64");
    }
}
