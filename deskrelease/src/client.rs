//! Caller-facing operations.
//!
//! [`CatalogClient`] ties a fetcher to the configured products and exposes the
//! three operations a front end needs: list a product's release documents,
//! list its selectable versions, and resolve a selection into files.

use tracing::debug;

use crate::catalog::{build_version_index, parse_catalog, sort_entries, CatalogEntry, VersionSelection};
use crate::config::ConfigFile;
use crate::error::{CatalogError, CatalogResult};
use crate::fetch::{CatalogFetcher, HttpFetcher};
use crate::product::ProductConfig;
use crate::resolver::{ResolveRequest, ResolvedDownloads, Resolver};

/// Entry point for listing and resolving releases.
pub struct CatalogClient<F> {
    resolver: Resolver<F>,
    fetcher: F,
    products: Vec<ProductConfig>,
}

impl CatalogClient<HttpFetcher> {
    /// Build an HTTP-backed client from a configuration file.
    pub fn from_config(config: &ConfigFile) -> CatalogResult<Self> {
        let fetcher = HttpFetcher::with_timeout(&config.catalog.base_url, config.catalog.timeout)?;
        Ok(Self::new(fetcher, config.products.clone()))
    }
}

impl<F: CatalogFetcher + Clone> CatalogClient<F> {
    /// Build a client around any fetcher.
    pub fn new(fetcher: F, products: Vec<ProductConfig>) -> Self {
        Self {
            resolver: Resolver::new(fetcher.clone()),
            fetcher,
            products,
        }
    }
}

impl<F: CatalogFetcher> CatalogClient<F> {
    /// Configured products.
    pub fn products(&self) -> &[ProductConfig] {
        &self.products
    }

    /// Look up a product by id.
    pub fn product(&self, id: &str) -> CatalogResult<&ProductConfig> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.to_string()))
    }

    /// The fetcher used for catalogs, also usable for component files.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Every downloadable release document of a product, newest first.
    ///
    /// An empty list means the catalog has no downloadable entries.
    pub fn list_versions(&self, product: &ProductConfig) -> CatalogResult<Vec<CatalogEntry>> {
        let xml = self.fetcher.fetch_text(&product.catalog_file)?;
        let mut entries = parse_catalog(&xml, product)?;
        sort_entries(&mut entries);

        debug!(product = %product.id, entries = entries.len(), "Listed versions");
        Ok(entries)
    }

    /// One selection per release, newest first.
    pub fn version_index(&self, product: &ProductConfig) -> CatalogResult<Vec<VersionSelection>> {
        let entries = self.list_versions(product)?;
        Ok(build_version_index(&entries))
    }

    /// Resolve the downloadable items of a selected release.
    pub fn resolve_downloads(
        &self,
        product: &ProductConfig,
        version: &str,
        build: &str,
        platform_or_arch: &str,
        bulletin_path: &str,
    ) -> CatalogResult<ResolvedDownloads> {
        self.resolver.resolve(&ResolveRequest {
            product,
            version,
            build,
            platform_or_arch,
            bulletin_path,
        })
    }

    /// Resolve the release a catalog entry belongs to.
    pub fn resolve_entry(
        &self,
        product: &ProductConfig,
        entry: &CatalogEntry,
    ) -> CatalogResult<ResolvedDownloads> {
        self.resolve_downloads(
            product,
            &entry.version,
            &entry.build,
            &entry.platform_or_arch,
            &entry.canonical_path,
        )
    }
}
