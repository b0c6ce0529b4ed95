//! `versions`: list releases of a product.
//!
//! By default one row per release (version, build, platform). `--all` lists
//! every release document, so core and packages bulletins appear separately.

use deskrelease::client::CatalogClient;
use deskrelease::config::ConfigFile;

use crate::error::CliError;

pub fn run(config: &ConfigFile, product_id: &str, all: bool, json: bool) -> Result<(), CliError> {
    let product = config.product(product_id)?;
    let client = CatalogClient::from_config(config)?;

    if all {
        let entries = client.list_versions(product)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else if entries.is_empty() {
            println!("No downloadable entries found for {}.", product.name);
        } else {
            for entry in &entries {
                println!("{}  {}", entry.display_label, entry.canonical_path);
            }
        }
        return Ok(());
    }

    let index = client.version_index(product)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&index)?);
    } else if index.is_empty() {
        println!("No downloadable entries found for {}.", product.name);
    } else {
        for selection in &index {
            println!("{}", selection.display_label);
        }
    }

    Ok(())
}
