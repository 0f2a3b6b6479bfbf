//! Catalog listing command.

use std::path::Path;

use florist_core::format_rubles;
use tracing::info;

use super::{CliError, load_catalog};

/// Log every product in catalog order with its formatted price.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be loaded.
pub fn list(path: Option<&Path>) -> Result<(), CliError> {
    let catalog = load_catalog(path)?;

    info!(products = catalog.len(), "Catalog");
    for product in &catalog {
        info!(
            "{:>3}  {:<20} {:>10}  {}",
            product.id,
            product.name,
            format_rubles(product.price.amount()),
            product.description
        );
    }

    Ok(())
}
