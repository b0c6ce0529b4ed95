//! Access to the update service.
//!
//! The pipeline only needs "bytes at path" and "text at path", so it depends
//! on the [`CatalogFetcher`] trait. [`HttpFetcher`] is the production
//! implementation; tests substitute an in-memory one.

mod http;

pub use http::{HttpFetcher, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

use crate::error::CatalogResult;

/// Fetches documents relative to the service base URL.
pub trait CatalogFetcher {
    /// Fetch raw bytes (bulletins, component files).
    fn fetch_bytes(&self, path: &str) -> CatalogResult<Vec<u8>>;

    /// Fetch a text document (product catalogs).
    fn fetch_text(&self, path: &str) -> CatalogResult<String>;
}

impl<F: CatalogFetcher + ?Sized> CatalogFetcher for &F {
    fn fetch_bytes(&self, path: &str) -> CatalogResult<Vec<u8>> {
        (**self).fetch_bytes(path)
    }

    fn fetch_text(&self, path: &str) -> CatalogResult<String> {
        (**self).fetch_text(path)
    }
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
