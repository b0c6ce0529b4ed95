//! Product catalog parsing and ordering.
//!
//! - `parser`: extracts [`CatalogEntry`] rows from a catalog document
//! - `ordering`: newest-first ordering shared by entries and selections
//! - `index`: collapses entries into one [`VersionSelection`] per release
//!
//! `parse_catalog` keeps every document; `build_version_index` collapses them.
//! The two views are intentionally different and are never merged.

mod entry;
mod index;
mod ordering;
mod parser;

pub use entry::{display_label, title_case, CatalogEntry};
pub use index::{build_version_index, VersionSelection};
pub use ordering::{compare_builds, compare_releases, compare_versions, sort_releases, ReleaseKey};
pub use parser::{entry_from_path, parse_catalog, INFO_ONLY_MARKER};

/// Sort catalog entries newest first.
pub fn sort_entries(entries: &mut [CatalogEntry]) {
    sort_releases(entries);
}
