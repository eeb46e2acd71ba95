//! Resolution of the executable path, fetching it on a cache miss.

mod strip;

use crate::archive::{ArchiveExtractor, ArchiveExtractorImpl};
use crate::cleanup::TempFileGuard;
use crate::config::FetchConfig;
use crate::download::{Downloader, HttpDownloader};
use crate::error::{FetchError, Result};
use crate::platform::{Platform, select_source};
use crate::resolve::{executable_name, executable_path};
use crate::runtime::{RealRuntime, Runtime};
use crate::source::SourceSpec;
use anyhow::Context;
use log::{debug, info, warn};
use reqwest::Url;
use std::io::Write;
use std::path::{Path, PathBuf};

use strip::strip_components;

/// Name used for the temporary archive when the URL has no file name.
const FALLBACK_ARCHIVE_NAME: &str = "download";

/// Prefix keeping the temporary archive apart from extracted entries.
const TEMP_ARCHIVE_PREFIX: &str = ".download-";

/// Resolves a platform-specific executable, downloading and unpacking it when
/// it is not on disk yet.
///
/// ```no_run
/// use binfetch::{FetchConfig, Fetcher, SourceSpec};
///
/// let base = "https://storage.googleapis.com/downloads.webmproject.org/releases/webp/";
/// let config = FetchConfig {
///     sources: vec![
///         SourceSpec::new(format!("{base}libwebp-0.6.0-mac-10.12.tar.gz")).for_os("darwin"),
///         SourceSpec::new(format!("{base}libwebp-0.6.0-linux-x86-64.tar.gz"))
///             .for_os("linux")
///             .for_arch("x64"),
///         SourceSpec::new(format!("{base}libwebp-0.6.0-windows-x64.zip"))
///             .for_os("win32")
///             .for_arch("x64")
///             .with_exec_override("cwebp.exe"),
///     ],
///     destination: Some("vendor/cwebp".into()),
///     strip_levels: 2,
///     ..FetchConfig::new("cwebp")
/// };
///
/// let cwebp = Fetcher::new(config)?.resolve()?;
/// # Ok::<(), binfetch::FetchError>(())
/// ```
pub struct Fetcher<R = RealRuntime, D = HttpDownloader, E = ArchiveExtractorImpl>
where
    R: Runtime,
    D: Downloader,
    E: ArchiveExtractor,
{
    config: FetchConfig,
    platform: Platform,
    runtime: R,
    downloader: D,
    extractor: E,
}

impl Fetcher {
    /// A fetcher for the running platform, using the real filesystem, HTTP
    /// and archive handling.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let downloader = HttpDownloader::build().map_err(FetchError::HttpClientSetup)?;
        Self::with_parts(
            config,
            Platform::detect(),
            RealRuntime,
            downloader,
            ArchiveExtractorImpl::new(),
        )
    }
}

impl<R, D, E> Fetcher<R, D, E>
where
    R: Runtime + 'static,
    D: Downloader,
    E: ArchiveExtractor,
{
    /// Assemble a fetcher from explicit collaborators. The config is
    /// validated once here.
    pub fn with_parts(
        config: FetchConfig,
        platform: Platform,
        runtime: R,
        downloader: D,
        extractor: E,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            platform,
            runtime,
            downloader,
            extractor,
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// The source candidate that applies to this fetcher's platform.
    pub fn selected_source(&self) -> Option<&SourceSpec> {
        select_source(&self.config.sources, &self.platform)
    }

    /// Return the path of the executable, fetching it first if nothing
    /// exists at that path yet.
    ///
    /// Without any registered source this is pure path computation.
    #[tracing::instrument(skip(self), fields(executable = %self.config.executable_name, platform = %self.platform))]
    pub fn resolve(&self) -> Result<PathBuf> {
        let source = self.selected_source();
        let path = self.executable_path(source, self.config.destination.as_deref());

        if self.config.sources.is_empty() {
            return Ok(path);
        }

        if self.runtime.try_exists(&path).map_err(FetchError::Filesystem)? {
            debug!("Found existing {:?}", path);
            return Ok(path);
        }

        info!("{} not found. Downloading...", path.display());

        let source = source.ok_or_else(|| FetchError::UnsupportedPlatform {
            os: self.platform.os.clone(),
            arch: self.platform.arch.clone(),
        })?;
        let destination = self
            .config
            .destination
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        self.fetch(source, &destination)?;

        let path = self.executable_path(Some(source), Some(&destination));
        self.mark_executable(&path);
        Ok(path)
    }

    fn executable_path(&self, source: Option<&SourceSpec>, destination: Option<&Path>) -> PathBuf {
        let name = executable_name(
            &self.config.executable_name,
            source,
            &self.platform,
            self.config.auto_platform_extension,
        );
        executable_path(destination, &name)
    }

    /// Download, extract and flatten `source` into `destination`.
    fn fetch(&self, source: &SourceSpec, destination: &Path) -> Result<()> {
        self.runtime
            .create_dir_all(destination)
            .map_err(FetchError::Filesystem)?;

        {
            let archive_path = destination.join(archive_file_name(&source.url)?);
            let file = self
                .runtime
                .create_file(&archive_path)
                .map_err(|e| FetchError::download(&source.url, e))?;
            let guard = TempFileGuard::new(&self.runtime, archive_path);

            self.download(&source.url, file)?;
            info!("{} downloaded. Trying to extract...", guard.path().display());

            self.extractor
                .extract(&self.runtime, guard.path(), destination)
                .map_err(|e| {
                    warn!(
                        "{} is not an archive or has an unsupported archive format",
                        guard.path().display()
                    );
                    FetchError::ExtractFailed {
                        archive: guard.path().to_path_buf(),
                        source: e,
                    }
                })?;
        }

        if self.config.strip_levels > 0 {
            strip_components(&self.runtime, destination, self.config.strip_levels).map_err(
                |e| FetchError::StripFailed {
                    dir: destination.to_path_buf(),
                    source: e,
                },
            )?;
        }

        Ok(())
    }

    /// Stream `url` into `file`. The file is closed on return.
    fn download(&self, url: &str, mut file: Box<dyn Write + Send>) -> Result<()> {
        let mut body = self
            .downloader
            .open(url)
            .map_err(|e| FetchError::download(url, e))?;

        let bytes = std::io::copy(&mut body, &mut file)
            .and_then(|bytes| file.flush().map(|_| bytes))
            .context("Failed to write download to disk")
            .map_err(|e| FetchError::download(url, e))?;

        debug!("Downloaded {:.2} MB", bytes as f64 / (1024.0 * 1024.0));
        Ok(())
    }

    fn mark_executable(&self, path: &Path) {
        if !self.runtime.is_file(path) {
            debug!("{:?} is not a file after fetching", path);
            return;
        }
        if let Err(e) = self.runtime.set_permissions(path, 0o755) {
            debug!("Failed to set permissions on {:?}: {}", path, e);
        }
    }
}

/// File name for the temporary download: the last segment of the URL path
/// behind [`TEMP_ARCHIVE_PREFIX`]. The extension survives for format
/// detection.
fn archive_file_name(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .with_context(|| format!("Invalid URL {}", url))
        .map_err(|e| FetchError::download(url, e))?;

    let name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(FALLBACK_ARCHIVE_NAME);

    Ok(format!("{}{}", TEMP_ARCHIVE_PREFIX, name))
}
