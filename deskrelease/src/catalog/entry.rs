//! Catalog entry type.

use serde::Serialize;

use super::ordering::ReleaseKey;

/// One downloadable release document listed in a product catalog.
///
/// Built once by the catalog parser and never mutated; `display_label` is
/// derived from the other fields at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Upstream path of the bulletin document, relative to the base URL.
    pub canonical_path: String,

    /// Dotted release version (e.g. "17.6.3").
    pub version: String,

    /// Numeric build string (e.g. "24583834").
    pub build: String,

    /// Platform or architecture token (e.g. "windows", "universal").
    pub platform_or_arch: String,

    /// Bulletin role ("core", "packages", ...).
    pub bulletin_type: String,

    /// Human readable label for selection lists.
    pub display_label: String,
}

impl CatalogEntry {
    /// Create an entry and compute its display label.
    pub fn new(
        canonical_path: impl Into<String>,
        version: impl Into<String>,
        build: impl Into<String>,
        platform_or_arch: impl Into<String>,
        bulletin_type: impl Into<String>,
    ) -> Self {
        let version = version.into();
        let build = build.into();
        let platform_or_arch = platform_or_arch.into();
        let bulletin_type = bulletin_type.into();
        let display_label = display_label(&version, &build, &platform_or_arch, &bulletin_type);

        Self {
            canonical_path: canonical_path.into(),
            version,
            build,
            platform_or_arch,
            bulletin_type,
            display_label,
        }
    }

    /// Whether this entry is the core bulletin of its release.
    pub fn is_core(&self) -> bool {
        self.bulletin_type == "core"
    }
}

impl ReleaseKey for CatalogEntry {
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

/// Compose `"{version} (Build {build}) - {Platform} - {Type}"`.
pub fn display_label(version: &str, build: &str, platform: &str, bulletin_type: &str) -> String {
    format!(
        "{} (Build {}) - {} - {}",
        version,
        build,
        title_case(platform),
        title_case(bulletin_type)
    )
}

/// Uppercase the first character, leave the rest untouched.
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
