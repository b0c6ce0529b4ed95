//! Checksum verification for downloaded component files.

use sha2::{Digest, Sha256};

use crate::bulletin::DownloadableItem;
use crate::error::{CatalogError, CatalogResult};

/// Outcome of verifying a file against its bulletin entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumStatus {
    /// The declared checksum matches.
    Verified,
    /// The bulletin declared no checksum for this file.
    NotDeclared,
    /// The bulletin declared an algorithm this crate does not implement.
    Unsupported(String),
}

/// Lowercase hex SHA-256 of `data`.
pub fn calculate_sha256(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Verify downloaded bytes against the checksum the bulletin declared.
///
/// # Errors
///
/// Returns [`CatalogError::ChecksumMismatch`] if a supported checksum does
/// not match.
pub fn verify(item: &DownloadableItem, data: &[u8]) -> CatalogResult<ChecksumStatus> {
    let mut verifier = ChecksumVerifier::new(item);
    verifier.update(data);
    verifier.finish()
}

/// Incremental verification for content that arrives in chunks.
///
/// Only hashes when the item declares a supported algorithm.
pub struct ChecksumVerifier<'a> {
    item: &'a DownloadableItem,
    hasher: Option<Sha256>,
}

impl<'a> ChecksumVerifier<'a> {
    pub fn new(item: &'a DownloadableItem) -> Self {
        let hasher = item
            .checksum
            .as_ref()
            .filter(|c| c.checksum_type.eq_ignore_ascii_case("sha256"))
            .map(|_| Sha256::new());
        Self { item, hasher }
    }

    /// Feed the next chunk of content.
    pub fn update(&mut self, chunk: &[u8]) {
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(chunk);
        }
    }

    /// Compare the digest of everything fed so far with the declared value.
    pub fn finish(self) -> CatalogResult<ChecksumStatus> {
        let Some(checksum) = &self.item.checksum else {
            return Ok(ChecksumStatus::NotDeclared);
        };
        let Some(hasher) = self.hasher else {
            return Ok(ChecksumStatus::Unsupported(checksum.checksum_type.clone()));
        };

        let actual = format!("{:x}", hasher.finalize());
        if !actual.eq_ignore_ascii_case(checksum.value.trim()) {
            return Err(CatalogError::ChecksumMismatch {
                file_name: self.item.file_name.clone(),
                expected: checksum.value.clone(),
                actual,
            });
        }

        Ok(ChecksumStatus::Verified)
    }
}
