//! Cart route handlers.
//!
//! Every browser session owns exactly one cart, kept in its
//! [`Shopper`](crate::models::Shopper) entry. Each handler applies one
//! operation under the cart lock and renders the result from the same lock,
//! so a concurrent request can neither undo it nor interleave with it.
//! Sessions that never added anything see an empty cart and get no cookie.

use axum::{Json, extract::State};
use florist_core::{Cart, CartLine, ProductId, format_rubles};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, Trail, add_breadcrumb};
use crate::models::session::{ensure_shopper_id, existing_shopper};
use crate::state::AppState;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub price: String,
    pub image: String,
    pub quantity: u32,
    pub line_total: u64,
    pub line_total_display: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        let line_total = line.line_total();
        Self {
            product_id: line.product_id(),
            name: line.product.name.clone(),
            price: line.product.price.display().to_string(),
            image: line.product.image.clone(),
            quantity: line.quantity(),
            line_total,
            line_total_display: format_rubles(line_total),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_count: u64,
    pub total_price: u64,
    pub total_price_display: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let total_price = cart.total_price();
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total_count: cart.total_count(),
            total_price,
            total_price_display: format_rubles(total_price),
        }
    }
}

/// Cart count badge.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// The line that was just added.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
}

/// Response to an add-to-cart request.
#[derive(Debug, Clone, Serialize)]
pub struct AddToCartResponse {
    pub added: AddedView,
    pub cart: CartView,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Update cart request body.
///
/// The quantity is signed so that zero and negative values reach the cart
/// and are clamped there rather than rejected by the extractor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

// =============================================================================
// Helpers
// =============================================================================

/// Apply `f` to the session's cart if it has one, otherwise to an empty cart
/// that is thrown away afterwards.
async fn with_existing_cart<T>(
    state: &AppState,
    session: &Session,
    f: impl FnOnce(&mut Cart) -> T,
) -> Result<T> {
    Ok(match existing_shopper(state, session).await? {
        Some(shopper) => shopper.update_cart(f),
        None => f(&mut Cart::new()),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let view = with_existing_cart(&state, &session, |cart| CartView::from(&*cart)).await?;
    Ok(Json(view))
}

/// Add one unit of a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<AddToCartResponse>> {
    let product = state
        .catalog()
        .get(request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let shopper = state.shopper(&ensure_shopper_id(&session).await?).await;
    let (quantity, cart) = shopper.update_cart(|cart| {
        let quantity = cart.add(product);
        (quantity, CartView::from(&*cart))
    });

    let product_id = product.id.to_string();
    add_breadcrumb(Trail::Cart, "Added to cart", &[("product_id", product_id.as_str())]);
    tracing::debug!(product_id = %product.id, quantity, "Added to cart");

    Ok(Json(AddToCartResponse {
        added: AddedView {
            product_id: product.id,
            name: product.name.clone(),
            quantity,
        },
        cart,
    }))
}

/// Set the quantity of a cart line. Unknown products are ignored.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let view = with_existing_cart(&state, &session, |cart| {
        cart.set_quantity(request.product_id, request.quantity);
        CartView::from(&*cart)
    })
    .await?;

    Ok(Json(view))
}

/// Remove a line from the cart. Unknown products are ignored.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let view = with_existing_cart(&state, &session, |cart| {
        cart.remove(request.product_id);
        CartView::from(&*cart)
    })
    .await?;

    let product_id = request.product_id.to_string();
    add_breadcrumb(Trail::Cart, "Removed from cart", &[("product_id", product_id.as_str())]);

    Ok(Json(view))
}

/// Get the cart count badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CartCount>> {
    let count = with_existing_cart(&state, &session, |cart| cart.total_count()).await?;
    Ok(Json(CartCount { count }))
}
