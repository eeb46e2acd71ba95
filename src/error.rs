use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure kinds surfaced by [`crate::Fetcher::resolve`].
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No binary found matching {os}/{arch}. It's probably not supported")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Unable to download {url}")]
    DownloadFailed {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to extract {archive}")]
    ExtractFailed {
        archive: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to strip leading directories in {dir}")]
    StripFailed {
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Directory creation and existence checks, passed through as-is.
    #[error(transparent)]
    Filesystem(anyhow::Error),

    #[error("Failed to set up the HTTP client")]
    HttpClientSetup(#[source] anyhow::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FetchError {
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        FetchError::InvalidConfig(message.into())
    }

    pub(crate) fn download(url: &str, source: anyhow::Error) -> Self {
        FetchError::DownloadFailed {
            url: url.to_string(),
            source,
        }
    }
}
