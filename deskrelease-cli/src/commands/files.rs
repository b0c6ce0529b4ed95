//! `files`: list the downloadable files of a release.

use deskrelease::client::CatalogClient;
use deskrelease::config::ConfigFile;
use deskrelease::resolver::{ResolvedDownloads, SkipReason};

use super::select_entry;
use crate::error::CliError;

pub fn run(
    config: &ConfigFile,
    product_id: &str,
    selector: &str,
    build: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    let product = config.product(product_id)?;
    let client = CatalogClient::from_config(config)?;

    let entry = select_entry(&client, product, selector, build)?;
    let resolved = client.resolve_entry(product, &entry)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!("{}", entry.display_label);
    print_items(&resolved, &config.catalog.base_url);
    Ok(())
}

fn print_items(resolved: &ResolvedDownloads, base_url: &str) {
    if resolved.is_empty() {
        println!("  No downloadable items found.");
    }

    for item in &resolved.items {
        println!("  {}", item.name);
        println!("    {}", item.url(base_url));
        if let Some(checksum) = &item.checksum {
            println!("    {}: {}", checksum.checksum_type, checksum.value);
        }
    }

    for skipped in &resolved.skipped {
        match &skipped.reason {
            SkipReason::NotPublished => {}
            SkipReason::Failed(reason) => {
                println!("  (skipped {}: {})", skipped.path, reason);
            }
        }
    }
}
