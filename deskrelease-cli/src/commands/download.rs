//! `download`: fetch the files of a release into a directory.

use std::path::Path;

use deskrelease::bulletin::DownloadableItem;
use deskrelease::checksum::ChecksumStatus;
use deskrelease::client::CatalogClient;
use deskrelease::config::ConfigFile;
use deskrelease::download::Downloader;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::select_entry;
use crate::error::CliError;

pub fn run(
    config: &ConfigFile,
    product_id: &str,
    selector: &str,
    build: Option<&str>,
    dest: &Path,
    only: Option<&str>,
) -> Result<(), CliError> {
    let product = config.product(product_id)?;
    let client = CatalogClient::from_config(config)?;

    let entry = select_entry(&client, product, selector, build)?;
    let resolved = client.resolve_entry(product, &entry)?;

    let items: Vec<&DownloadableItem> = resolved
        .items
        .iter()
        .filter(|item| only.map_or(true, |text| matches_filter(item, text)))
        .collect();

    if items.is_empty() {
        println!("No downloadable items found for {}.", entry.display_label);
        return Ok(());
    }

    let downloader = Downloader::from_settings(&config.catalog)?;

    let progress = ProgressBar::new(items.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for item in items {
        let file_name = item.file_name.clone();
        progress.set_message(file_name.clone());

        let done = downloader.download(item, dest, &mut |bytes| {
            progress.set_message(format!("{} ({})", file_name, HumanBytes(bytes)));
        })?;

        if let ChecksumStatus::Unsupported(kind) = &done.checksum {
            warn!(file = %item.file_name, checksum = %kind, "Checksum type not supported, not verified");
        }
        info!(file = %done.path.display(), bytes = done.bytes, "Downloaded");
        progress.inc(1);
    }

    progress.finish_with_message("done");
    Ok(())
}

fn matches_filter(item: &DownloadableItem, text: &str) -> bool {
    item.name.contains(text) || item.file_name.contains(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_filter() {
        let item = DownloadableItem {
            name: "vmware-tools-windows".to_string(),
            directory_fragment: "ws/17.6.3/24583834/windows/packages/".to_string(),
            file_name: "vmware-tools-windows-12.5.0.tar".to_string(),
            checksum: None,
        };
        assert!(matches_filter(&item, "tools"));
        assert!(matches_filter(&item, "12.5.0"));
        assert!(!matches_filter(&item, "linux"));
    }
}
