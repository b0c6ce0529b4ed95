//! Component file downloads.
//!
//! Files are streamed to `<name>.part` next to their destination while being
//! hashed, and renamed into place only after the declared checksum matches.
//! A failed or mismatching download leaves no partial file and does not touch
//! an existing file of the same name.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::bulletin::DownloadableItem;
use crate::checksum::{ChecksumStatus, ChecksumVerifier};
use crate::config::CatalogSettings;
use crate::error::{CatalogError, CatalogResult};

/// Default deadline for one component file, body included.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 3600;

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Suffix of in-progress files.
const PARTIAL_SUFFIX: &str = ".part";

/// A file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
    pub checksum: ChecksumStatus,
}

/// Streams component files from the update service.
///
/// Separate from the catalog fetcher: catalog requests are small and use a
/// short deadline, installers are large and get their own.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    base_url: String,
    pub(crate) timeout: Duration,
}

impl Downloader {
    /// Create a downloader. `connect_timeout` bounds connection setup,
    /// `timeout` bounds the whole transfer.
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> CatalogResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .user_agent(concat!("deskrelease/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::InvalidConfig(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Create a downloader from catalog settings.
    pub fn from_settings(settings: &CatalogSettings) -> CatalogResult<Self> {
        Self::new(&settings.base_url, settings.timeout, settings.download_timeout)
    }

    /// Download `item` into `dest_dir`, verifying its checksum on the way.
    ///
    /// `on_progress` receives the number of bytes written so far.
    pub fn download(
        &self,
        item: &DownloadableItem,
        dest_dir: &Path,
        on_progress: &mut dyn FnMut(u64),
    ) -> CatalogResult<Downloaded> {
        let path = item.relative_path();
        let url = item.url(&self.base_url);
        debug!(url = %url, "Downloading");

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                CatalogError::upstream_io(
                    &path,
                    format!("download timed out after {}s", self.timeout.as_secs()),
                )
            } else {
                CatalogError::upstream_io(&path, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::upstream_status(&path, status.as_u16()));
        }

        write_verified(response, &path, item, dest_dir, on_progress)
    }
}

/// Stream `reader` into `dest_dir` as `item`, verifying its checksum.
///
/// `source_path` names the upstream document in read errors.
///
/// # Errors
///
/// - [`CatalogError::UpstreamFetchFailed`] if reading fails midway
/// - [`CatalogError::WriteFailed`] if the file cannot be written
/// - [`CatalogError::ChecksumMismatch`] if the content does not match
pub fn write_verified<R: Read>(
    reader: R,
    source_path: &str,
    item: &DownloadableItem,
    dest_dir: &Path,
    on_progress: &mut dyn FnMut(u64),
) -> CatalogResult<Downloaded> {
    fs::create_dir_all(dest_dir).map_err(|source| CatalogError::WriteFailed {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let target = dest_dir.join(local_file_name(item));
    let partial = partial_path(&target);

    let (bytes, checksum) = match stream_to_file(reader, source_path, item, &partial, on_progress) {
        Ok(done) => done,
        Err(e) => {
            if let Err(remove_err) = fs::remove_file(&partial) {
                if remove_err.kind() != ErrorKind::NotFound {
                    warn!(path = %partial.display(), error = %remove_err, "Could not remove partial file");
                }
            }
            return Err(e);
        }
    };

    fs::rename(&partial, &target).map_err(|source| CatalogError::WriteFailed {
        path: target.clone(),
        source,
    })?;

    Ok(Downloaded {
        path: target,
        bytes,
        checksum,
    })
}

fn stream_to_file<R: Read>(
    mut reader: R,
    source_path: &str,
    item: &DownloadableItem,
    partial: &Path,
    on_progress: &mut dyn FnMut(u64),
) -> CatalogResult<(u64, ChecksumStatus)> {
    let write_failed = |source: std::io::Error| CatalogError::WriteFailed {
        path: partial.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(partial).map_err(write_failed)?);
    let mut verifier = ChecksumVerifier::new(item);
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CatalogError::upstream_io(
                    source_path,
                    format!("read error: {}", e),
                ))
            }
        };

        verifier.update(&buffer[..bytes_read]);
        writer
            .write_all(&buffer[..bytes_read])
            .map_err(write_failed)?;

        written += bytes_read as u64;
        on_progress(written);
    }

    writer.flush().map_err(write_failed)?;
    drop(writer);

    let status = verifier.finish()?;
    Ok((written, status))
}

/// Local file name for an item: the last segment of its relative file name.
pub fn local_file_name(item: &DownloadableItem) -> &str {
    item.file_name
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(&item.name)
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(PARTIAL_SUFFIX);
    target.with_file_name(name)
}
