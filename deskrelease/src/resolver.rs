//! Resolve a selected release into its downloadable items.
//!
//! A release is described by one or two bulletins:
//!
//! ```text
//! ws/17.6.3/24583834/windows/core/metadata.xml.gz       primary (required)
//! ws/17.6.3/24583834/windows/packages/metadata.xml.gz   secondary (optional)
//! ```
//!
//! Documents are fetched one after another, primary first, so a failing
//! primary never costs a second round trip. A secondary failure is recorded in
//! the result and does not fail the resolve.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bulletin::{parse_bulletin, DownloadableItem};
use crate::decompress::decompress;
use crate::error::{CatalogError, CatalogResult};
use crate::fetch::CatalogFetcher;
use crate::product::{BulletinLayout, ProductConfig};

/// Bulletin type of the primary document of a multi-bulletin release.
pub const CORE_TYPE: &str = "core";

/// Bulletin type of the secondary document.
pub const PACKAGES_TYPE: &str = "packages";

/// Whether a document failure aborts the resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    Primary,
    Secondary,
}

/// One bulletin document to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletinDocument {
    /// Path relative to the base URL.
    pub path: String,
    /// Directory of `path`, with trailing `/`.
    pub directory: String,
    pub role: DocumentRole,
}

impl BulletinDocument {
    fn new(path: impl Into<String>, role: DocumentRole) -> CatalogResult<Self> {
        let path = path.into();
        let directory = bulletin_directory(&path)?.to_string();
        Ok(Self {
            path,
            directory,
            role,
        })
    }
}

/// Why a secondary document contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The upstream has no such document for this release.
    NotPublished,
    /// The document exists but could not be fetched or read.
    Failed(String),
}

/// A secondary document that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub path: String,
    pub reason: SkipReason,
}

/// Selected release to resolve.
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    pub product: &'a ProductConfig,
    pub version: &'a str,
    pub build: &'a str,
    pub platform_or_arch: &'a str,
    /// Path of the selected bulletin, as listed in the catalog.
    pub bulletin_path: &'a str,
}

/// Items of a release, plus the secondary documents that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedDownloads {
    pub items: Vec<DownloadableItem>,
    pub skipped: Vec<SkippedDocument>,
}

impl ResolvedDownloads {
    /// True when the resolve succeeded but produced no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Directory of a bulletin path: everything up to and including the last `/`.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidBulletinPath`] if the path has fewer than two
/// `/`-separated segments.
pub fn bulletin_directory(path: &str) -> CatalogResult<&str> {
    match path.rfind('/') {
        Some(idx) => Ok(&path[..=idx]),
        None => Err(CatalogError::InvalidBulletinPath(path.to_string())),
    }
}

/// Decide which documents describe the selected release.
///
/// The selected document always comes first. For core+packages products a
/// selected core bulletin is followed by its packages sibling.
pub fn plan_documents(
    product: &ProductConfig,
    bulletin_path: &str,
) -> CatalogResult<Vec<BulletinDocument>> {
    let mut plan = vec![BulletinDocument::new(bulletin_path, DocumentRole::Primary)?];

    if product.layout == BulletinLayout::CoreAndPackages {
        if let Some(sibling) = sibling_path(bulletin_path, CORE_TYPE, PACKAGES_TYPE) {
            plan.push(BulletinDocument::new(sibling, DocumentRole::Secondary)?);
        }
    }

    Ok(plan)
}

/// Replace the bulletin type segment (the one before the filename).
fn sibling_path(path: &str, from: &str, to: &str) -> Option<String> {
    let mut parts: Vec<&str> = path.split('/').collect();
    let idx = parts.len().checked_sub(2)?;
    if parts[idx] != from {
        return None;
    }
    parts[idx] = to;
    Some(parts.join("/"))
}

/// Fetch, decompress and parse one bulletin.
pub fn load_document<F: CatalogFetcher>(
    fetcher: &F,
    document: &BulletinDocument,
) -> CatalogResult<Vec<DownloadableItem>> {
    let payload = fetcher.fetch_bytes(&document.path)?;
    let xml = decompress(&payload)?;
    parse_bulletin(&xml, &document.directory)
}

/// Resolves releases against one fetcher.
///
/// Holds no state between calls.
pub struct Resolver<F> {
    fetcher: F,
}

impl<F: CatalogFetcher> Resolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Resolve the downloadable items of a release.
    ///
    /// # Errors
    ///
    /// Any failure of the primary document is returned unchanged. Secondary
    /// failures are reported in [`ResolvedDownloads::skipped`].
    pub fn resolve(&self, request: &ResolveRequest<'_>) -> CatalogResult<ResolvedDownloads> {
        let plan = plan_documents(request.product, request.bulletin_path)?;
        let mut resolved = ResolvedDownloads::default();

        for document in &plan {
            match load_document(&self.fetcher, document) {
                Ok(items) => {
                    debug!(
                        path = %document.path,
                        items = items.len(),
                        "Loaded bulletin"
                    );
                    resolved.items.extend(items);
                }
                Err(e) if document.role == DocumentRole::Primary => return Err(e),
                Err(e) if e.is_not_found() => {
                    debug!(path = %document.path, "Secondary bulletin not published");
                    resolved.skipped.push(SkippedDocument {
                        path: document.path.clone(),
                        reason: SkipReason::NotPublished,
                    });
                }
                Err(e) => {
                    warn!(path = %document.path, error = %e, "Skipping secondary bulletin");
                    resolved.skipped.push(SkippedDocument {
                        path: document.path.clone(),
                        reason: SkipReason::Failed(e.to_string()),
                    });
                }
            }
        }

        info!(
            product = %request.product.id,
            version = request.version,
            build = request.build,
            platform = request.platform_or_arch,
            items = resolved.items.len(),
            skipped = resolved.skipped.len(),
            "Resolved downloads"
        );

        Ok(resolved)
    }
}
