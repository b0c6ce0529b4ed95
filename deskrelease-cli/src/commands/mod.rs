//! Subcommand implementations.

pub mod config;
pub mod download;
pub mod files;
pub mod products;
pub mod versions;

use deskrelease::catalog::{entry_from_path, CatalogEntry};
use deskrelease::client::CatalogClient;
use deskrelease::fetch::CatalogFetcher;
use deskrelease::product::ProductConfig;

use crate::error::CliError;

/// Pick the release document a selector refers to.
///
/// A selector containing `/` is a bulletin path and is used as is. Anything
/// else is a version; the newest matching document wins, which is the core
/// bulletin when one exists.
pub fn select_entry<F: CatalogFetcher>(
    client: &CatalogClient<F>,
    product: &ProductConfig,
    selector: &str,
    build: Option<&str>,
) -> Result<CatalogEntry, CliError> {
    let no_match = || CliError::NoMatchingRelease {
        product: product.id.clone(),
        selector: selector.to_string(),
    };

    if selector.contains('/') {
        return entry_from_path(selector, product).ok_or_else(no_match);
    }

    client
        .list_versions(product)?
        .into_iter()
        .find(|e| e.version == selector && build.map_or(true, |b| e.build == b))
        .ok_or_else(no_match)
}
