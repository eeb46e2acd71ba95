//! HTTP client handing out response bodies as readers.

use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};

/// Statuses in [200, 400) count as success. Redirects are followed by the
/// client, so a 3xx only surfaces once the redirect limit is hit.
pub fn is_acceptable_status(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}

/// Blocking HTTP client wrapper.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

const USER_AGENT: &str = concat!("binfetch/", env!("CARGO_PKG_VERSION"));

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client identifying itself with this crate's user agent.
    pub fn build() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Sends a GET request and returns the response once its status is
    /// known to be acceptable. A single attempt; nothing is retried.
    #[tracing::instrument(skip(self))]
    pub fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .context("Failed to start download request")?;

        let status = response.status();
        if !is_acceptable_status(status) {
            return Err(anyhow!("HTTP {} error", status.as_u16()));
        }

        Ok(response)
    }
}
