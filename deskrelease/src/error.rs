//! Error types for catalog and bulletin operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while listing versions or resolving downloads.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The upstream service answered with a non-success status, or the request
    /// failed before a status was received (network error, timeout).
    #[error("failed to fetch {path}: {reason}")]
    UpstreamFetchFailed {
        path: String,
        status: Option<u16>,
        reason: String,
    },

    /// The fetched payload was zero bytes long.
    #[error("received empty payload")]
    EmptyPayload,

    /// The payload was not a valid or complete gzip stream.
    #[error("failed to decompress gzip data: {0}")]
    DecompressionFailed(String),

    /// The decompressed data is not text or does not look like XML.
    #[error("decompressed data is not valid XML")]
    NotXml,

    /// The top-level catalog document could not be used.
    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),

    /// A bulletin document could not be parsed.
    #[error("malformed bulletin: {0}")]
    MalformedBulletin(String),

    /// A bulletin path does not have a directory component.
    #[error("invalid bulletin path: {0}")]
    InvalidBulletinPath(String),

    /// No product with this identifier is configured.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or write the configuration file.
    #[error("failed to access config file {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a downloaded file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Downloaded content does not match the declared checksum.
    #[error("checksum mismatch for {file_name}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file_name: String,
        expected: String,
        actual: String,
    },
}

impl CatalogError {
    /// Build an upstream failure for a non-success HTTP status.
    pub fn upstream_status(path: impl Into<String>, status: u16) -> Self {
        Self::UpstreamFetchFailed {
            path: path.into(),
            status: Some(status),
            reason: format!("upstream returned status {}", status),
        }
    }

    /// Build an upstream failure that happened before any status was received.
    pub fn upstream_io(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpstreamFetchFailed {
            path: path.into(),
            status: None,
            reason: reason.into(),
        }
    }

    /// The upstream status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamFetchFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the upstream reported that the document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404) | Some(410))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_display() {
        let err = CatalogError::upstream_status("ws-windows.xml", 503);
        assert_eq!(
            err.to_string(),
            "failed to fetch ws-windows.xml: upstream returned status 503"
        );
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_detection() {
        assert!(CatalogError::upstream_status("a/b.gz", 404).is_not_found());
        assert!(CatalogError::upstream_status("a/b.gz", 410).is_not_found());
        assert!(!CatalogError::upstream_io("a/b.gz", "connection reset").is_not_found());
        assert!(!CatalogError::EmptyPayload.is_not_found());
    }

    #[test]
    fn test_checksum_mismatch_display() {
        let err = CatalogError::ChecksumMismatch {
            file_name: "foo.exe".to_string(),
            expected: "abc123".to_string(),
            actual: "def456".to_string(),
        };
        assert!(err.to_string().contains("checksum mismatch"));
        assert!(err.to_string().contains("abc123"));
        assert!(err.to_string().contains("def456"));
    }
}
