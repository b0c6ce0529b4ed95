//! Integration tests for listing and resolving releases.
//!
//! These tests drive the full pipeline against an in-memory update service:
//! - catalog fetch → parse → sort → version index
//! - bulletin fetch → gunzip → parse → merge
//! - secondary bulletin failures and primary short-circuit
//!
//! Run with: `cargo test --test resolve_integration`

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;

use deskrelease::bulletin::Checksum;
use deskrelease::checksum::{verify, ChecksumStatus};
use deskrelease::client::CatalogClient;
use deskrelease::decompress::compress;
use deskrelease::download::write_verified;
use deskrelease::fetch::CatalogFetcher;
use deskrelease::product::{default_products, ProductConfig};
use deskrelease::resolver::SkipReason;
use deskrelease::{CatalogError, CatalogResult};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Canned response for one path.
enum Canned {
    Body(Vec<u8>),
    Status(u16),
}

/// Update service held in memory, recording every requested path.
#[derive(Default)]
struct MemoryService {
    responses: HashMap<String, Canned>,
    requests: RefCell<Vec<String>>,
}

impl MemoryService {
    fn with_text(mut self, path: &str, body: &str) -> Self {
        self.responses
            .insert(path.to_string(), Canned::Body(body.as_bytes().to_vec()));
        self
    }

    fn with_gzip(mut self, path: &str, xml: &str) -> Self {
        let gz = compress(xml.as_bytes()).expect("compress fixture");
        self.responses.insert(path.to_string(), Canned::Body(gz));
        self
    }

    fn with_bytes(mut self, path: &str, bytes: &[u8]) -> Self {
        self.responses
            .insert(path.to_string(), Canned::Body(bytes.to_vec()));
        self
    }

    fn with_status(mut self, path: &str, status: u16) -> Self {
        self.responses.insert(path.to_string(), Canned::Status(status));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl CatalogFetcher for MemoryService {
    fn fetch_bytes(&self, path: &str) -> CatalogResult<Vec<u8>> {
        self.requests.borrow_mut().push(path.to_string());
        match self.responses.get(path) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(CatalogError::upstream_status(path, *status)),
            None => Err(CatalogError::upstream_status(path, 404)),
        }
    }

    fn fetch_text(&self, path: &str) -> CatalogResult<String> {
        let bytes = self.fetch_bytes(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn product(id: &str) -> ProductConfig {
    default_products()
        .into_iter()
        .find(|p| p.id == id)
        .expect("built-in product")
}

fn catalog(urls: &[&str]) -> String {
    let records: String = urls
        .iter()
        .map(|url| format!("  <metadata>\n    <url>{}</url>\n  </metadata>\n", url))
        .collect();
    format!("<?xml version=\"1.0\"?>\n<metaList>\n{}</metaList>\n", records)
}

fn bulletin(components: &[(&str, &str)]) -> String {
    let body: String = components
        .iter()
        .map(|(payload, path)| {
            format!(
                "<component><payload>{}</payload><relativePath>{}</relativePath></component>",
                payload, path
            )
        })
        .collect();
    format!(
        "<metadataResponse><bulletin><componentList>{}</componentList></bulletin></metadataResponse>",
        body
    )
}

const WS_CORE: &str = "ws/17.6.3/24583834/windows/core/metadata.xml.gz";
const WS_PACKAGES: &str = "ws/17.6.3/24583834/windows/packages/metadata.xml.gz";

// ============================================================================
// Listing
// ============================================================================

#[test]
fn test_list_versions_end_to_end() {
    let service = MemoryService::default().with_text(
        "ws-windows.xml",
        &catalog(&[
            "ws/17.5.0/22583795/windows/core/metadata.xml.gz",
            "ws/17.6.3/24583834/windows/info-only/metadata.xml.gz",
            WS_PACKAGES,
            WS_CORE,
        ]),
    );
    let client = CatalogClient::new(&service, default_products());
    let product = product("ws-windows");

    let entries = client.list_versions(&product).unwrap();
    let paths: Vec<_> = entries.iter().map(|e| e.canonical_path.as_str()).collect();
    assert_eq!(
        paths,
        [
            WS_CORE,
            WS_PACKAGES,
            "ws/17.5.0/22583795/windows/core/metadata.xml.gz"
        ]
    );
    assert_eq!(entries[0].display_label, "17.6.3 (Build 24583834) - Windows - Core");

    let index = client.version_index(&product).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index[0].canonical_path, WS_CORE);
}

#[test]
fn test_list_versions_empty_catalog_is_success() {
    let service = MemoryService::default().with_text(
        "player-linux.xml",
        &catalog(&["player/16.0.0/1/linux/info-only/metadata.xml.gz"]),
    );
    let client = CatalogClient::new(&service, default_products());

    let entries = client.list_versions(&product("player-linux")).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn test_list_versions_upstream_failure() {
    let service = MemoryService::default().with_status("ws-linux.xml", 503);
    let client = CatalogClient::new(&service, default_products());

    let err = client.list_versions(&product("ws-linux")).unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[test]
fn test_list_versions_malformed_catalog() {
    let service = MemoryService::default().with_text("ws-linux.xml", "Gateway Timeout");
    let client = CatalogClient::new(&service, default_products());

    let err = client.list_versions(&product("ws-linux")).unwrap_err();
    assert!(matches!(err, CatalogError::MalformedCatalog(_)));
}

#[test]
fn test_fusion_catalog_uses_product_arch() {
    let service = MemoryService::default().with_text(
        "fusion-arm64.xml",
        &catalog(&["fusion/13.0.0/20802013/core/metadata.xml.gz"]),
    );
    let client = CatalogClient::new(&service, default_products());

    let entries = client.list_versions(&product("fusion-arm64")).unwrap();
    assert_eq!(entries[0].platform_or_arch, "arm64");
    assert_eq!(entries[0].display_label, "13.0.0 (Build 20802013) - Arm64 - Core");
}

// ============================================================================
// Resolving
// ============================================================================

#[test]
fn test_resolve_merges_core_and_packages() {
    let service = MemoryService::default()
        .with_gzip(
            WS_CORE,
            &bulletin(&[("Workstation", "VMware-workstation-17.6.3.exe.tar")]),
        )
        .with_gzip(
            WS_PACKAGES,
            &bulletin(&[("Tools Windows", "vmware-tools-windows.tar"), ("Tools Linux", "vmware-tools-linux.tar")]),
        );
    let client = CatalogClient::new(&service, default_products());

    let resolved = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap();

    let names: Vec<_> = resolved.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Workstation", "Tools Windows", "Tools Linux"]);
    assert_eq!(
        resolved.items[0].directory_fragment,
        "ws/17.6.3/24583834/windows/core/"
    );
    assert_eq!(
        resolved.items[1].directory_fragment,
        "ws/17.6.3/24583834/windows/packages/"
    );
    assert!(resolved.skipped.is_empty());
    assert_eq!(service.requests(), [WS_CORE, WS_PACKAGES]);
}

#[test]
fn test_core_failure_short_circuits() {
    let service = MemoryService::default()
        .with_status(WS_CORE, 500)
        .with_gzip(WS_PACKAGES, &bulletin(&[("Tools", "tools.tar")]));
    let client = CatalogClient::new(&service, default_products());

    let err = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(service.requests(), [WS_CORE]);
}

#[test]
fn test_core_decompression_failure_is_fatal() {
    let service = MemoryService::default().with_bytes(WS_CORE, b"not gzip at all");
    let client = CatalogClient::new(&service, default_products());

    let err = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap_err();
    assert!(matches!(err, CatalogError::DecompressionFailed(_)));
    assert_eq!(service.requests(), [WS_CORE]);
}

#[test]
fn test_core_empty_payload_is_fatal() {
    let service = MemoryService::default().with_bytes(WS_CORE, b"");
    let client = CatalogClient::new(&service, default_products());

    let err = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap_err();
    assert!(matches!(err, CatalogError::EmptyPayload));
}

#[test]
fn test_core_not_xml_is_fatal() {
    let service = MemoryService::default()
        .with_gzip(WS_CORE, "{\"components\": []}")
        .with_gzip(WS_PACKAGES, &bulletin(&[("Tools", "tools.tar")]));
    let client = CatalogClient::new(&service, default_products());

    let err = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotXml));
    assert_eq!(service.requests(), [WS_CORE]);
}

#[test]
fn test_core_malformed_bulletin_is_fatal() {
    let service = MemoryService::default()
        .with_gzip(WS_CORE, "<metadataResponse><bulletin><componentList></bulletin>")
        .with_gzip(WS_PACKAGES, &bulletin(&[("Tools", "tools.tar")]));
    let client = CatalogClient::new(&service, default_products());

    let err = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap_err();
    assert!(matches!(err, CatalogError::MalformedBulletin(_)));
    assert_eq!(service.requests(), [WS_CORE]);
}

#[test]
fn test_missing_packages_is_not_an_error() {
    let service = MemoryService::default()
        .with_gzip(WS_CORE, &bulletin(&[("Workstation", "ws.exe.tar")]))
        .with_status(WS_PACKAGES, 404);
    let client = CatalogClient::new(&service, default_products());

    let resolved = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap();

    assert_eq!(resolved.items.len(), 1);
    assert_eq!(resolved.skipped.len(), 1);
    assert_eq!(resolved.skipped[0].path, WS_PACKAGES);
    assert_eq!(resolved.skipped[0].reason, SkipReason::NotPublished);
}

#[test]
fn test_broken_packages_is_recorded() {
    let service = MemoryService::default()
        .with_gzip(WS_CORE, &bulletin(&[("Workstation", "ws.exe.tar")]))
        .with_gzip(WS_PACKAGES, "<bulletin><componentList></bulletin>");
    let client = CatalogClient::new(&service, default_products());

    let resolved = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap();

    assert_eq!(resolved.items.len(), 1);
    assert!(matches!(resolved.skipped[0].reason, SkipReason::Failed(_)));
}

#[test]
fn test_single_layout_fetches_one_document() {
    let path = "player/17.6.3/24583834/linux/core/metadata.xml.gz";
    let service = MemoryService::default().with_gzip(path, &bulletin(&[("Player", "player.bundle.tar")]));
    let client = CatalogClient::new(&service, default_products());

    let resolved = client
        .resolve_downloads(&product("player-linux"), "17.6.3", "24583834", "linux", path)
        .unwrap();

    assert_eq!(resolved.items.len(), 1);
    assert_eq!(service.requests(), [path]);
}

#[test]
fn test_empty_bulletins_resolve_to_empty_success() {
    let service = MemoryService::default()
        .with_gzip(WS_CORE, &bulletin(&[]))
        .with_gzip(WS_PACKAGES, &bulletin(&[]));
    let client = CatalogClient::new(&service, default_products());

    let resolved = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap();
    assert!(resolved.is_empty());
    assert!(resolved.skipped.is_empty());
}

#[test]
fn test_resolve_then_verify_download() {
    let file_path = "ws/17.6.3/24583834/windows/core/foo.exe.tar";
    let content = b"hello world";
    let xml = "<metadataResponse><bulletin><componentList><component>\
        <payload>FooInstaller</payload><relativePath>foo.exe.tar</relativePath>\
        <checksum><checksumType>sha256</checksumType>\
        <checksum>b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9</checksum>\
        </checksum></component></componentList></bulletin></metadataResponse>";

    let service = MemoryService::default()
        .with_gzip(WS_CORE, xml)
        .with_bytes(file_path, content);
    let client = CatalogClient::new(&service, default_products());

    let resolved = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap();
    let item = &resolved.items[0];
    assert_eq!(
        item.checksum,
        Some(Checksum {
            checksum_type: "sha256".to_string(),
            value: "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9".to_string(),
        })
    );

    let bytes = client.fetcher().fetch_bytes(&item.relative_path()).unwrap();
    assert_eq!(verify(item, &bytes).unwrap(), ChecksumStatus::Verified);

    let dest = TempDir::new().unwrap();
    let done = write_verified(
        Cursor::new(bytes),
        &item.relative_path(),
        item,
        dest.path(),
        &mut |_| {},
    )
    .unwrap();
    assert_eq!(done.path, dest.path().join("foo.exe.tar"));
    assert_eq!(done.checksum, ChecksumStatus::Verified);
    assert_eq!(std::fs::read(&done.path).unwrap(), content);
}

#[test]
fn test_resolved_downloads_serialize_to_json() {
    let service = MemoryService::default()
        .with_gzip(WS_CORE, &bulletin(&[("Workstation", "ws.exe.tar")]));
    let client = CatalogClient::new(&service, default_products());

    let resolved = client
        .resolve_downloads(&product("ws-windows"), "17.6.3", "24583834", "windows", WS_CORE)
        .unwrap();
    let json = serde_json::to_value(&resolved).unwrap();

    assert_eq!(json["items"][0]["file_name"], "ws.exe.tar");
    assert_eq!(json["skipped"][0]["reason"]["kind"], "not_published");
}
