//! Version index for selection lists.
//!
//! A catalog may list several documents for the same release (a core and a
//! packages bulletin). Selection lists show each release once, so the index
//! keeps the first document per `(version, build, platform)`.

use std::collections::HashSet;

use serde::Serialize;

use super::entry::CatalogEntry;
use super::ordering::{sort_releases, ReleaseKey};

/// One selectable release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSelection {
    pub version: String,
    pub build: String,
    pub platform_or_arch: String,

    /// Label of the document that represents this release.
    pub display_label: String,

    /// Path of the document that represents this release.
    pub canonical_path: String,

    /// Role of the representing document.
    pub bulletin_type: String,
}

impl VersionSelection {
    /// Dedup key.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.version, &self.build, &self.platform_or_arch)
    }
}

impl From<&CatalogEntry> for VersionSelection {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            version: entry.version.clone(),
            build: entry.build.clone(),
            platform_or_arch: entry.platform_or_arch.clone(),
            display_label: entry.display_label.clone(),
            canonical_path: entry.canonical_path.clone(),
            bulletin_type: entry.bulletin_type.clone(),
        }
    }
}

impl ReleaseKey for VersionSelection {
    fn version(&self) -> &str {
        &self.version
    }

    fn build(&self) -> &str {
        &self.build
    }

    fn bulletin_type(&self) -> &str {
        &self.bulletin_type
    }

    fn canonical_path(&self) -> &str {
        &self.canonical_path
    }
}

/// Collapse entries to one per release and sort newest first.
///
/// The first entry seen for a release wins, so callers that pass an already
/// sorted catalog get the core document as the representative.
pub fn build_version_index(entries: &[CatalogEntry]) -> Vec<VersionSelection> {
    let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();
    let mut index = Vec::new();

    for entry in entries {
        let key = (
            entry.version.as_str(),
            entry.build.as_str(),
            entry.platform_or_arch.as_str(),
        );
        if seen.insert(key) {
            index.push(VersionSelection::from(entry));
        }
    }

    sort_releases(&mut index);
    index
}
