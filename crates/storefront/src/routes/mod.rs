//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /api/catalog            - Product listing
//! GET  /api/catalog/{id}       - Product detail
//!
//! # Cart (session-scoped)
//! GET  /api/cart               - Cart view
//! GET  /api/cart/count         - Cart count badge
//! POST /api/cart/add           - Add one unit of a product
//! POST /api/cart/update        - Set a line's quantity
//! POST /api/cart/remove        - Remove a line
//!
//! # Checkout
//! POST /api/checkout/validate  - Validate the checkout form
//! GET  /api/checkout/form      - Checkout draft: last form and its errors
//! POST /api/checkout/form      - Edit one draft field, clearing its error
//! POST /api/checkout           - Place the order
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{id}", get(catalog::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::submit))
        .route("/validate", post(checkout::validate))
        .route("/form", get(checkout::draft).post(checkout::edit_field))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/catalog", catalog_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/checkout", checkout_routes())
}
