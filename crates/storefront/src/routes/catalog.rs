//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use florist_core::{Product, ProductId};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    /// Display price as listed, e.g. `"3 500 ₽"`.
    pub price: String,
    /// Whole roubles.
    pub price_amount: u64,
    pub description: String,
    pub image: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.display().to_string(),
            price_amount: product.price.amount(),
            description: product.description.clone(),
            image: product.image.clone(),
        }
    }
}

/// List every product in catalog order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<ProductView>> {
    Json(state.catalog().iter().map(ProductView::from).collect())
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    state
        .catalog()
        .get(id)
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
