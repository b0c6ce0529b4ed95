//! Downloadable item type.

use serde::Serialize;

use crate::fetch::join_url;

/// Checksum declared by a bulletin for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checksum {
    /// Algorithm name as written by the publisher (e.g. "sha256").
    pub checksum_type: String,
    /// Hex digest.
    pub value: String,
}

/// One file published as part of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadableItem {
    /// Display name.
    pub name: String,

    /// Directory of the bulletin the item came from, ending in `/`.
    pub directory_fragment: String,

    /// Path of the file relative to `directory_fragment`.
    pub file_name: String,

    /// Checksum, when the bulletin declared one.
    pub checksum: Option<Checksum>,
}

impl DownloadableItem {
    /// Path of the file relative to the catalog base URL.
    pub fn relative_path(&self) -> String {
        format!("{}{}", self.directory_fragment, self.file_name)
    }

    /// Absolute download URL under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        join_url(base_url, &self.relative_path())
    }
}
