//! Host target detection.
//!
//! Release artifacts are keyed by `"<arch>-<os>"` identifiers such as
//! `x86_64-linux` or `aarch64-macos`. The identifier for the running
//! machine is derived from the compile-time architecture and OS names.

use std::fmt;

/// The `"<arch>-<os>"` identifier used to select an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostTarget {
    arch: String,
    os: String,
}

impl HostTarget {
    /// Detect the target of the running machine.
    pub fn current() -> Self {
        Self::new(std::env::consts::ARCH, std::env::consts::OS)
    }

    /// Build a target from raw architecture and OS names, applying the
    /// same normalization as detection. Unrecognized architectures fall
    /// back to x86_64; unrecognized OS names pass through unmapped.
    pub fn new(arch: &str, os: &str) -> Self {
        Self {
            arch: normalize_arch(arch).to_string(),
            os: normalize_os(os),
        }
    }

    /// The artifact-map key for this target.
    pub fn ident(&self) -> String {
        format!("{}-{}", self.arch, self.os)
    }

    /// Architecture component (`x86_64` or `aarch64`).
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// OS component (`linux`, `macos`, `windows`, `freebsd`, ...).
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Whether release archives for this target are zip files.
    pub fn uses_zip(&self) -> bool {
        self.os == "windows"
    }
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}

fn normalize_arch(arch: &str) -> &str {
    match arch {
        "x86_64" | "aarch64" => arch,
        "arm64" => "aarch64",
        "amd64" => "x86_64",
        _ => "x86_64",
    }
}

fn normalize_os(os: &str) -> String {
    match os {
        "darwin" => "macos".to_string(),
        "win32" => "windows".to_string(),
        other => other.to_string(),
    }
}
