//! Product registry.
//!
//! A product is one catalog file on the update service (for example
//! `ws-windows.xml`). Products belong to a family, which decides how many
//! bulletin documents make up a release and how catalog paths are read.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CatalogError;

/// Sentinel arch label used when a macOS product has no known architecture.
pub const UNKNOWN_ARCH: &str = "unknown";

/// Product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductFamily {
    /// Workstation Pro (Windows and Linux hosts).
    Workstation,
    /// Workstation Player.
    Player,
    /// Fusion, the macOS family.
    Fusion,
}

impl ProductFamily {
    /// Whether catalogs of this family use the short macOS path layout.
    pub fn is_macos(&self) -> bool {
        matches!(self, Self::Fusion)
    }

    /// Bulletin layout used when a product does not configure one.
    pub fn default_layout(&self) -> BulletinLayout {
        match self {
            Self::Workstation | Self::Fusion => BulletinLayout::CoreAndPackages,
            Self::Player => BulletinLayout::Single,
        }
    }
}

impl fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workstation => write!(f, "workstation"),
            Self::Player => write!(f, "player"),
            Self::Fusion => write!(f, "fusion"),
        }
    }
}

impl FromStr for ProductFamily {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workstation" | "ws" => Ok(Self::Workstation),
            "player" => Ok(Self::Player),
            "fusion" | "macos" => Ok(Self::Fusion),
            other => Err(CatalogError::InvalidConfig(format!(
                "unknown product family '{}'",
                other
            ))),
        }
    }
}

/// How many bulletin documents describe one release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BulletinLayout {
    /// A single `core` bulletin.
    Single,
    /// A `core` bulletin followed by an optional `packages` bulletin.
    CoreAndPackages,
}

impl fmt::Display for BulletinLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "core"),
            Self::CoreAndPackages => write!(f, "core+packages"),
        }
    }
}

impl FromStr for BulletinLayout {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "core" | "single" => Ok(Self::Single),
            "core+packages" | "core,packages" => Ok(Self::CoreAndPackages),
            other => Err(CatalogError::InvalidConfig(format!(
                "unknown bulletin layout '{}'",
                other
            ))),
        }
    }
}

/// A product published on the update service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductConfig {
    /// Identifier used on the command line (e.g. "ws-windows").
    pub id: String,

    /// Human readable name.
    pub name: String,

    /// Catalog filename relative to the base URL (e.g. "ws-windows.xml").
    pub catalog_file: String,

    /// Product family.
    pub family: ProductFamily,

    /// Bulletin documents per release.
    pub layout: BulletinLayout,

    /// Architecture label for catalogs whose paths do not carry one.
    pub arch: Option<String>,
}

impl ProductConfig {
    /// Create a product using the family's default layout and an arch label
    /// derived from the identifier.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        catalog_file: impl Into<String>,
        family: ProductFamily,
    ) -> Self {
        let id = id.into();
        let arch = arch_from_product_id(&id).map(str::to_string);
        Self {
            name: name.into(),
            catalog_file: catalog_file.into(),
            layout: family.default_layout(),
            family,
            arch,
            id,
        }
    }

    /// Override the bulletin layout.
    pub fn with_layout(mut self, layout: BulletinLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Override the arch label.
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    /// Arch label for short macOS catalog paths.
    pub fn arch_label(&self) -> &str {
        self.arch.as_deref().unwrap_or(UNKNOWN_ARCH)
    }
}

/// Derive a macOS arch label from a product identifier.
///
/// The plain `fusion` catalog predates universal builds and is Intel only.
pub fn arch_from_product_id(id: &str) -> Option<&'static str> {
    match id {
        "fusion-universal" => Some("universal"),
        "fusion-arm64" => Some("arm64"),
        "fusion-intel" | "fusion" => Some("intel"),
        _ => None,
    }
}

/// Products published on the public update service.
pub fn default_products() -> Vec<ProductConfig> {
    vec![
        ProductConfig::new(
            "ws-windows",
            "VMware Workstation Pro for Windows",
            "ws-windows.xml",
            ProductFamily::Workstation,
        ),
        ProductConfig::new(
            "ws-linux",
            "VMware Workstation Pro for Linux",
            "ws-linux.xml",
            ProductFamily::Workstation,
        ),
        ProductConfig::new(
            "fusion-universal",
            "VMware Fusion Pro for macOS (Universal)",
            "fusion-universal.xml",
            ProductFamily::Fusion,
        ),
        ProductConfig::new(
            "fusion-arm64",
            "VMware Fusion Pro for macOS (ARM64)",
            "fusion-arm64.xml",
            ProductFamily::Fusion,
        ),
        ProductConfig::new(
            "fusion-intel",
            "VMware Fusion Pro for macOS (Intel)",
            "fusion.xml",
            ProductFamily::Fusion,
        ),
        ProductConfig::new(
            "player-linux",
            "VMware Player for Linux",
            "player-linux.xml",
            ProductFamily::Player,
        ),
        ProductConfig::new(
            "player-windows",
            "VMware Player for Windows",
            "player-windows.xml",
            ProductFamily::Player,
        ),
    ]
}
