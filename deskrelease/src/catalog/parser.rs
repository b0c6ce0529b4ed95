//! Catalog XML parsing.
//!
//! A product catalog is a flat list of `<metadata>` records, each carrying the
//! path of one bulletin document in its `<url>` tag:
//!
//! ```text
//! <metaList>
//!   <metadata>
//!     <url>ws/17.6.3/24583834/windows/core/metadata.xml.gz</url>
//!     ...
//!   </metadata>
//! </metaList>
//! ```
//!
//! Paths come in two shapes:
//!
//! - `product/version/build/platform/type/metadata.xml.gz` (six or more segments)
//! - `fusion/version/build/type/metadata.xml.gz` (five segments, macOS only),
//!   where the architecture is implied by which catalog the path came from
//!
//! Records are located by pattern rather than by a full XML parse; catalogs mix
//! in unrelated records and only the `<url>` text matters.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::entry::CatalogEntry;
use crate::decompress::looks_like_xml;
use crate::error::{CatalogError, CatalogResult};
use crate::product::ProductConfig;

/// Marker found in paths of records without a downloadable payload.
pub const INFO_ONLY_MARKER: &str = "info-only";

fn metadata_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<metadata>(.*?)</metadata>").unwrap())
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<url>([^<]+)</url>").unwrap())
}

/// Parse a product catalog into entries, in order of appearance.
///
/// Info-only records and paths of an unrecognized shape are skipped. The
/// result is not sorted; see [`sort_entries`](super::sort_entries).
///
/// # Errors
///
/// Returns [`CatalogError::MalformedCatalog`] if the text is empty or is not XML.
/// A catalog without any usable record is not an error.
pub fn parse_catalog(xml: &str, product: &ProductConfig) -> CatalogResult<Vec<CatalogEntry>> {
    if xml.trim().is_empty() {
        return Err(CatalogError::MalformedCatalog(format!(
            "catalog for {} is empty",
            product.id
        )));
    }
    if !looks_like_xml(xml) {
        return Err(CatalogError::MalformedCatalog(format!(
            "catalog for {} is not XML",
            product.id
        )));
    }

    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for block in metadata_pattern().captures_iter(xml) {
        let Some(path) = url_pattern()
            .captures(&block[1])
            .map(|url| url[1].trim().to_string())
        else {
            skipped += 1;
            continue;
        };

        match entry_from_path(&path, product) {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }

    debug!(
        product = %product.id,
        entries = entries.len(),
        skipped,
        "Parsed catalog"
    );

    Ok(entries)
}

/// Build an entry from a bulletin path.
///
/// Returns `None` for info-only paths and for paths matching neither known shape.
pub fn entry_from_path(path: &str, product: &ProductConfig) -> Option<CatalogEntry> {
    if path.contains(INFO_ONLY_MARKER) {
        return None;
    }

    let parts: Vec<&str> = path.split('/').collect();
    let bulletin_type = parts.len().checked_sub(2).map(|i| parts[i])?;

    if parts.len() >= 6 {
        Some(CatalogEntry::new(
            path,
            parts[1],
            parts[2],
            parts[3],
            bulletin_type,
        ))
    } else if parts.len() == 5 && product.family.is_macos() {
        // parts[3] is the bulletin directory here, not a platform
        Some(CatalogEntry::new(
            path,
            parts[1],
            parts[2],
            product.arch_label(),
            bulletin_type,
        ))
    } else {
        None
    }
}
