//! HTTP fetcher for the update service.
//!
//! Every request is bounded by the client timeout; an expired request is
//! reported like any other transport failure.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::debug;

use super::{join_url, CatalogFetcher};
use crate::error::{CatalogError, CatalogResult};

/// Public update service for desktop products.
pub const DEFAULT_BASE_URL: &str = "https://softwareupdate-prod.broadcom.com/cds/vmw-desktop/";

/// Default timeout for HTTP requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blocking HTTP implementation of [`CatalogFetcher`].
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    pub(crate) timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> CatalogResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a fetcher with a custom per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> CatalogResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("deskrelease/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::InvalidConfig(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a GET and fail on anything but a success status.
    fn get(&self, path: &str) -> CatalogResult<Response> {
        let url = join_url(&self.base_url, path);
        debug!(url = %url, "Fetching");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.transport_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::upstream_status(path, status.as_u16()));
        }

        Ok(response)
    }

    fn transport_error(&self, path: &str, e: reqwest::Error) -> CatalogError {
        if e.is_timeout() {
            CatalogError::upstream_io(
                path,
                format!("request timed out after {}s", self.timeout.as_secs()),
            )
        } else {
            CatalogError::upstream_io(path, e.to_string())
        }
    }
}

impl CatalogFetcher for HttpFetcher {
    fn fetch_bytes(&self, path: &str) -> CatalogResult<Vec<u8>> {
        let bytes = self
            .get(path)?
            .bytes()
            .map_err(|e| self.transport_error(path, e))?;
        Ok(bytes.to_vec())
    }

    fn fetch_text(&self, path: &str) -> CatalogResult<String> {
        self.get(path)?
            .text()
            .map_err(|e| self.transport_error(path, e))
    }
}
