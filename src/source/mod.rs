//! Download source candidates.
//!
//! A [`SourceSpec`] ties one download URL to an operating system and an
//! architecture. Empty `os` or `arch` fields act as wildcards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One platform-conditional download candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSpec {
    /// URL of the archive to download
    pub url: String,
    /// Target OS (`darwin`, `linux`, `win32`, ...); empty matches any
    pub os: String,
    /// Target architecture (`x64`, `x86`, `arm64`, ...); empty matches any
    pub arch: String,
    /// Executable name to use instead of the configured one; empty keeps it
    #[serde(rename = "exec", alias = "exec_override")]
    pub exec_override: String,
}

impl SourceSpec {
    /// A candidate that applies to every platform.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn for_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    pub fn for_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn with_exec_override(mut self, name: impl Into<String>) -> Self {
        self.exec_override = name.into();
        self
    }

    /// Returns the override name, if one was given.
    pub fn exec_override(&self) -> Option<&str> {
        if self.exec_override.is_empty() {
            None
        } else {
            Some(&self.exec_override)
        }
    }

    /// Whether this candidate applies to the given OS and architecture.
    pub fn matches(&self, os: &str, arch: &str) -> bool {
        (self.os.is_empty() || self.os == os) && (self.arch.is_empty() || self.arch == arch)
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let os = if self.os.is_empty() { "*" } else { &self.os };
        let arch = if self.arch.is_empty() { "*" } else { &self.arch };
        write!(f, "{} ({}/{})", self.url, os, arch)
    }
}
