//! deskrelease - release discovery for VMware desktop products
//!
//! The update service publishes one XML catalog per product. Each catalog
//! lists release documents ("bulletins"), gzip-compressed XML files that in
//! turn list the component files of a release. This crate turns those
//! documents into structured data:
//!
//! ```text
//! catalog XML ──parse_catalog──► CatalogEntry ──(caller selects)──┐
//!                                                                  ▼
//! DownloadableItem ◄──parse_bulletin◄──decompress◄──fetch◄── Resolver
//! ```
//!
//! # Example
//!
//! ```no_run
//! use deskrelease::client::CatalogClient;
//! use deskrelease::config::ConfigFile;
//!
//! # fn main() -> deskrelease::error::CatalogResult<()> {
//! let config = ConfigFile::load()?;
//! let client = CatalogClient::from_config(&config)?;
//! let product = client.product("ws-windows")?.clone();
//!
//! let entries = client.list_versions(&product)?;
//! if let Some(latest) = entries.first() {
//!     let resolved = client.resolve_entry(&product, latest)?;
//!     for item in &resolved.items {
//!         println!("{} {}", item.name, item.url(&config.catalog.base_url));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod bulletin;
pub mod catalog;
pub mod checksum;
pub mod client;
pub mod config;
pub mod decompress;
pub mod download;
pub mod error;
pub mod fetch;
pub mod product;
pub mod resolver;

pub use error::{CatalogError, CatalogResult};
