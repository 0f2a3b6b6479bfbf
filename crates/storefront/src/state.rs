//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use florist_core::{Catalog, CatalogError, CheckoutFlow, Notifier, OrderProcessor};
use moka::future::Cache;

use crate::config::StorefrontConfig;
use crate::middleware::session::SESSION_EXPIRY;
use crate::models::Shopper;
use crate::services::{SimulatedOrderProcessor, TracingNotifier};

/// Error building the application state at start-up.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the checkout ports and the per-session shopper state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    processor: Arc<dyn OrderProcessor>,
    notifier: Arc<dyn Notifier>,
    shoppers: Cache<String, Arc<Shopper>>,
}

impl AppState {
    /// Create the application state with the default checkout ports.
    ///
    /// Loads the catalog from `config.catalog_path` when set, otherwise uses
    /// the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let payload = std::fs::read_to_string(path)?;
                let catalog = Catalog::from_json(&payload)?;
                tracing::info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
                catalog
            }
            None => Catalog::builtin(),
        };

        let processor = Arc::new(SimulatedOrderProcessor::new(config.processing_delay));
        let notifier = Arc::new(TracingNotifier);

        Ok(Self::with_ports(config, catalog, processor, notifier))
    }

    /// Create the application state with explicit checkout ports.
    #[must_use]
    pub fn with_ports(
        config: StorefrontConfig,
        catalog: Catalog,
        processor: Arc<dyn OrderProcessor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        // No size bound: an entry leaves only after a session's worth of
        // inactivity, the same rule the session store applies.
        let shoppers = Cache::builder()
            .time_to_idle(Duration::from_secs(SESSION_EXPIRY.unsigned_abs()))
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                processor,
                notifier,
                shoppers,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The shopper state for `id`, created empty on first use.
    pub async fn shopper(&self, id: &str) -> Arc<Shopper> {
        let processor = Arc::clone(&self.inner.processor);
        let notifier = Arc::clone(&self.inner.notifier);

        self.inner
            .shoppers
            .get_with(id.to_owned(), async move {
                Arc::new(Shopper::new(CheckoutFlow::new(processor, notifier)))
            })
            .await
    }

    /// The shopper state for `id` if it is still live. Never creates one.
    pub async fn find_shopper(&self, id: &str) -> Option<Arc<Shopper>> {
        self.inner.shoppers.get(id).await
    }
}
