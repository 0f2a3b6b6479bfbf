//! Checkout commands: form validation and offline orders.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use florist_core::{Cart, CheckoutFlow, OrderSummary, ProductId, SubmitOutcome, ValidationErrors};
use florist_storefront::config::StorefrontConfig;
use florist_storefront::services::{SimulatedOrderProcessor, TracingNotifier};
use tracing::{error, info};

use super::{CliError, FormArgs, load_catalog};

/// Validate a checkout form and log each error.
///
/// # Errors
///
/// Returns [`CliError::InvalidForm`] when the form has errors, or a loading
/// error.
pub fn validate(args: &FormArgs) -> Result<(), CliError> {
    let form = args.build()?;
    let errors = florist_core::validate(&form);

    if errors.is_empty() {
        info!("Form is valid");
        return Ok(());
    }

    report(&errors);
    Err(CliError::InvalidForm(errors.len()))
}

/// Fill a cart with `products` and place the order.
///
/// Each ID adds one unit. The delay defaults to the storefront's configured
/// processing delay.
///
/// # Errors
///
/// Returns an error if a product is unknown, the form is invalid, or the
/// order is not accepted.
pub async fn order(
    products: &[ProductId],
    args: &FormArgs,
    delay_ms: Option<u64>,
    catalog_path: Option<&Path>,
) -> Result<(), CliError> {
    let catalog = load_catalog(catalog_path)?;
    let form = args.build()?;

    let mut cart = Cart::new();
    for id in products {
        let product = catalog.get(*id).ok_or(CliError::UnknownProduct(*id))?;
        cart.add(product);
    }

    let summary = OrderSummary::from_cart(&cart);
    info!(
        items = summary.item_count,
        total = %florist_core::format_rubles(summary.total_price),
        "Cart ready"
    );

    let delay = delay_ms.map_or_else(default_delay, Duration::from_millis);
    let flow = CheckoutFlow::new(
        Arc::new(SimulatedOrderProcessor::new(delay)),
        Arc::new(TracingNotifier),
    );

    match flow.submit(&form, summary, |_| cart.clear()).await? {
        SubmitOutcome::Placed(receipt) => {
            let confirmation = receipt.confirmation;
            info!(
                order_id = %confirmation.order_id,
                placed_at = %confirmation.placed_at,
                items = confirmation.item_count,
                total = %florist_core::format_rubles(confirmation.total_price),
                "{}: {}",
                receipt.notification.title,
                receipt.notification.message
            );
            info!(items = cart.total_count(), "Cart cleared");
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            report(&errors);
            Err(CliError::InvalidForm(errors.len()))
        }
    }
}

fn default_delay() -> Duration {
    StorefrontConfig::from_env().map_or_else(
        |e| {
            tracing::warn!("Ignoring storefront configuration: {e}");
            StorefrontConfig::default().processing_delay
        },
        |config| config.processing_delay,
    )
}

fn report(errors: &ValidationErrors) {
    error!("Form validation failed:");
    for (field, message) in errors.iter() {
        error!("  - {field}: {message}");
    }
}
