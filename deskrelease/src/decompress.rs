//! Gzip decompression for bulletin payloads.
//!
//! Bulletins are published as `metadata.xml.gz`. The upstream does not set
//! `Content-Encoding`, so payloads arrive still compressed and must be inflated
//! here before the XML can be parsed.
//!
//! A payload may hold several gzip members back to back; all of them are
//! inflated and concatenated. Bytes after the last member that are not another
//! gzip member make the payload corrupt.

use std::io::{Read, Write};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{CatalogError, CatalogResult};

/// Byte order mark some publishers prepend to XML documents.
const BOM: char = '\u{feff}';

/// Decompress a gzip payload into XML text.
///
/// # Errors
///
/// - [`CatalogError::EmptyPayload`] if `data` is zero bytes long
/// - [`CatalogError::DecompressionFailed`] if `data` is not a sequence of complete
///   gzip members
/// - [`CatalogError::NotXml`] if the inflated bytes are not UTF-8 or do not start
///   with `<` once surrounding whitespace is removed
pub fn decompress(data: &[u8]) -> CatalogResult<String> {
    if data.is_empty() {
        return Err(CatalogError::EmptyPayload);
    }

    let mut decoder = MultiGzDecoder::new(data);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| CatalogError::DecompressionFailed(e.to_string()))?;

    let text = String::from_utf8(inflated).map_err(|_| CatalogError::NotXml)?;
    if !looks_like_xml(&text) {
        return Err(CatalogError::NotXml);
    }

    Ok(text)
}

/// Gzip-compress `data`.
///
/// Used to build fixtures; the service never uploads anything.
pub fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Cheap XML sniff: first significant character is `<`.
pub(crate) fn looks_like_xml(text: &str) -> bool {
    text.trim_start()
        .trim_start_matches(BOM)
        .trim_start()
        .starts_with('<')
}
