use crate::http::HttpClient;
use anyhow::Result;
use log::info;
use std::io::Read;

/// Fetches the bytes behind a URL.
#[cfg_attr(test, mockall::automock)]
pub trait Downloader: Send + Sync {
    /// Start fetching `url`. An unacceptable status fails here; transport
    /// errors in the middle of the body surface while reading the stream.
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>>;
}

/// [`Downloader`] backed by the blocking [`HttpClient`].
#[derive(Clone)]
pub struct HttpDownloader {
    http_client: HttpClient,
}

impl HttpDownloader {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// A downloader over [`HttpClient::build`].
    pub fn build() -> Result<Self> {
        Ok(Self::new(HttpClient::build()?))
    }
}

impl Downloader for HttpDownloader {
    #[tracing::instrument(skip(self))]
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        info!("Downloading file from {}...", url);
        let response = self.http_client.get(url)?;
        Ok(Box::new(response))
    }
}
