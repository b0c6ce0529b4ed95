//! CLI error type.

use std::fmt;

use deskrelease::CatalogError;

/// Errors surfaced to the command line.
#[derive(Debug)]
pub enum CliError {
    /// Library error (fetch, parse, config).
    Catalog(CatalogError),

    /// Configuration problem detected by the CLI itself.
    Config(String),

    /// The selector matched no release.
    NoMatchingRelease { product: String, selector: String },

    /// Failed to render JSON output.
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Catalog(e) => write!(f, "{}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::NoMatchingRelease { product, selector } => {
                write!(f, "No release of {} matches '{}'", product, selector)
            }
            CliError::Json(e) => write!(f, "Failed to render JSON: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Catalog(e) => Some(e),
            CliError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}
