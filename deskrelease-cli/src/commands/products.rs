//! `products`: list configured products.

use deskrelease::config::ConfigFile;

use crate::error::CliError;

pub fn run(config: &ConfigFile) -> Result<(), CliError> {
    let width = config
        .products
        .iter()
        .map(|p| p.id.len())
        .max()
        .unwrap_or(0);

    for product in &config.products {
        println!(
            "{:<width$}  {}  [{}, {}]",
            product.id,
            product.name,
            product.catalog_file,
            product.layout,
            width = width
        );
    }

    Ok(())
}
