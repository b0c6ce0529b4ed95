//! Configuration file.
//!
//! Settings live in an INI file under the user's config directory
//! (`~/.config/deskrelease/config.ini` on Linux). Every key is optional; a
//! missing file means built-in defaults.
//!
//! ```ini
//! [catalog]
//! base_url = https://softwareupdate-prod.broadcom.com/cds/vmw-desktop/
//! timeout_secs = 30
//! download_timeout_secs = 3600
//!
//! [product.ws-windows]
//! bulletins = core
//!
//! [product.fusion-tp]
//! name = Fusion Tech Preview
//! catalog = fusion-tp.xml
//! family = fusion
//! arch = arm64
//! ```
//!
//! A `[product.<id>]` section overrides the matching built-in product field by
//! field, or adds a new product when no built-in has that id.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{Ini, Properties};
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::download::DEFAULT_DOWNLOAD_TIMEOUT_SECS;
use crate::fetch::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::product::{default_products, BulletinLayout, ProductConfig, ProductFamily};

/// Config filename inside the application config directory.
pub const CONFIG_FILENAME: &str = "config.ini";

/// Application directory name.
const APP_DIR: &str = "deskrelease";

/// Prefix of product section names.
const PRODUCT_SECTION_PREFIX: &str = "product.";

/// Update service connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Base URL catalog and bulletin paths are relative to.
    pub base_url: String,

    /// Per-request timeout for catalogs and bulletins.
    pub timeout: Duration,

    /// Deadline for one component file download, body included.
    pub download_timeout: Duration,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
        }
    }
}

impl CatalogSettings {
    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the component download deadline.
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub catalog: CatalogSettings,
    pub products: Vec<ProductConfig>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings::default(),
            products: default_products(),
        }
    }
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> CatalogResult<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> CatalogResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| CatalogError::ConfigIo {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse INI text.
    pub fn parse(content: &str) -> CatalogResult<Self> {
        let ini = Ini::load_from_str(content)
            .map_err(|e| CatalogError::InvalidConfig(e.to_string()))?;
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("catalog")) {
            if let Some(url) = section.get("base_url") {
                config.catalog.base_url = url.trim().to_string();
            }
            if let Some(secs) = section.get("timeout_secs") {
                config.catalog.timeout = Duration::from_secs(parse_timeout("timeout_secs", secs)?);
            }
            if let Some(secs) = section.get("download_timeout_secs") {
                config.catalog.download_timeout =
                    Duration::from_secs(parse_timeout("download_timeout_secs", secs)?);
            }
        }

        for (name, props) in ini.iter() {
            if let Some(id) = name.and_then(|n| n.strip_prefix(PRODUCT_SECTION_PREFIX)) {
                apply_product_section(&mut config.products, id.trim(), props)?;
            }
        }

        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> CatalogResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CatalogError::ConfigIo {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, self.to_ini_string()?).map_err(|e| CatalogError::ConfigIo {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Render as INI text.
    pub fn to_ini_string(&self) -> CatalogResult<String> {
        let mut ini = Ini::new();
        ini.set_to(
            Some("catalog"),
            "base_url".to_string(),
            self.catalog.base_url.clone(),
        );
        ini.set_to(
            Some("catalog"),
            "timeout_secs".to_string(),
            self.catalog.timeout.as_secs().to_string(),
        );
        ini.set_to(
            Some("catalog"),
            "download_timeout_secs".to_string(),
            self.catalog.download_timeout.as_secs().to_string(),
        );

        for product in &self.products {
            let section = format!("{}{}", PRODUCT_SECTION_PREFIX, product.id);
            let mut fields = vec![
                ("name", product.name.clone()),
                ("catalog", product.catalog_file.clone()),
                ("family", product.family.to_string()),
                ("bulletins", product.layout.to_string()),
            ];
            if let Some(arch) = &product.arch {
                fields.push(("arch", arch.clone()));
            }
            for (key, value) in fields {
                ini.set_to(Some(section.as_str()), key.to_string(), value);
            }
        }

        let mut buf = Vec::new();
        ini.write_to(&mut buf)
            .map_err(|e| CatalogError::InvalidConfig(format!("failed to render config: {}", e)))?;
        String::from_utf8(buf)
            .map_err(|e| CatalogError::InvalidConfig(format!("rendered config is not UTF-8: {}", e)))
    }

    /// Look up a configured product.
    pub fn product(&self, id: &str) -> CatalogResult<&ProductConfig> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.to_string()))
    }
}

/// Default config file location.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILENAME)
}

fn parse_timeout(key: &str, value: &str) -> CatalogResult<u64> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(CatalogError::InvalidConfig(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

fn apply_product_section(
    products: &mut Vec<ProductConfig>,
    id: &str,
    props: &Properties,
) -> CatalogResult<()> {
    let family = props
        .get("family")
        .map(str::parse::<ProductFamily>)
        .transpose()?;
    let layout = props
        .get("bulletins")
        .map(str::parse::<BulletinLayout>)
        .transpose()?;
    let name = props.get("name").map(|s| s.trim().to_string());
    let catalog = props.get("catalog").map(|s| s.trim().to_string());
    let arch = props.get("arch").map(|s| s.trim().to_string());

    if let Some(existing) = products.iter_mut().find(|p| p.id == id) {
        if let Some(name) = name {
            existing.name = name;
        }
        if let Some(catalog) = catalog {
            existing.catalog_file = catalog;
        }
        if let Some(family) = family {
            existing.family = family;
        }
        if let Some(layout) = layout {
            existing.layout = layout;
        }
        if let Some(arch) = arch {
            existing.arch = Some(arch);
        }
        return Ok(());
    }

    let (Some(catalog), Some(family)) = (catalog, family) else {
        return Err(CatalogError::InvalidConfig(format!(
            "product '{}' needs both 'catalog' and 'family'",
            id
        )));
    };

    let mut product = ProductConfig::new(id, name.unwrap_or_else(|| id.to_string()), catalog, family);
    if let Some(layout) = layout {
        product = product.with_layout(layout);
    }
    if let Some(arch) = arch {
        product = product.with_arch(arch);
    }
    products.push(product);
    Ok(())
}
