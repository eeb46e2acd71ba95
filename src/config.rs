use crate::error::{FetchError, Result};
use crate::source::SourceSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything a [`crate::Fetcher`] needs to know about the executable it
/// resolves.
///
/// Build it as a struct literal, with [`FetchConfig::new`], or from JSON:
///
/// ```json
/// {
///   "executable_name": "cwebp",
///   "destination": "vendor/cwebp",
///   "strip_levels": 2,
///   "auto_platform_extension": true,
///   "sources": [
///     { "url": "https://example.com/cwebp-linux-x64.tar.gz", "os": "linux", "arch": "x64" },
///     { "url": "https://example.com/cwebp-win-x64.zip", "os": "win32", "arch": "x64", "exec": "cwebp.exe" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Download candidates, in priority order
    pub sources: Vec<SourceSpec>,
    /// Directory receiving the extracted files. Downloads fall back to `.`
    pub destination: Option<PathBuf>,
    /// Base name of the executable inside `destination`
    pub executable_name: String,
    /// Number of leading directories to flatten after extraction
    pub strip_levels: usize,
    /// Append `.exe` to the executable name on Windows
    pub auto_platform_extension: bool,
}

impl FetchConfig {
    pub fn new(executable_name: impl Into<String>) -> Self {
        Self {
            executable_name: executable_name.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FetchConfig = serde_json::from_str(json)
            .map_err(|e| FetchError::invalid_config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            FetchError::invalid_config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.executable_name.trim().is_empty() {
            return Err(FetchError::invalid_config("executable name is empty"));
        }
        if let Some(position) = self.sources.iter().position(|s| s.url.trim().is_empty()) {
            return Err(FetchError::invalid_config(format!(
                "source #{} has no url",
                position + 1
            )));
        }
        Ok(())
    }
}
