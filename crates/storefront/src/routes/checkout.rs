//! Checkout route handlers.
//!
//! Each session's [`Shopper`](crate::models::Shopper) entry carries its own
//! [`CheckoutFlow`](florist_core::CheckoutFlow), so a second submit from the
//! same session is refused while the first is being processed. It also keeps
//! the checkout draft: the last submitted form with its errors, which the
//! shopper edits one field at a time.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use florist_core::{
    CheckoutDraft, CheckoutForm, Field, Notification, OrderSummary, Receipt, SubmitOutcome,
    ValidationErrors, format_rubles,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result, Trail, add_breadcrumb};
use crate::models::session::{ensure_shopper_id, existing_shopper};
use crate::state::AppState;

/// Result of validating a checkout form.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
}

impl From<ValidationErrors> for ValidationResponse {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub item_count: u64,
    pub total_price: u64,
    pub total_price_display: String,
    pub notification: Notification,
}

impl From<Receipt> for CheckoutResponse {
    fn from(receipt: Receipt) -> Self {
        let confirmation = receipt.confirmation;
        Self {
            order_id: confirmation.order_id,
            placed_at: confirmation.placed_at,
            item_count: confirmation.item_count,
            total_price: confirmation.total_price,
            total_price_display: format_rubles(confirmation.total_price),
            notification: receipt.notification,
        }
    }
}

/// One edit to the checkout draft.
#[derive(Debug, Deserialize)]
pub struct FieldEditRequest {
    pub field: Field,
    pub value: String,
}

/// Validate a checkout form without submitting it.
#[instrument(skip_all)]
pub async fn validate(Json(form): Json<CheckoutForm>) -> Json<ValidationResponse> {
    Json(florist_core::validate(&form).into())
}

/// The session's checkout draft. Sessions without one get an empty draft.
#[instrument(skip_all)]
pub async fn draft(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutDraft>> {
    let shopper = existing_shopper(&state, &session).await?;
    Ok(Json(shopper.map(|s| s.draft()).unwrap_or_default()))
}

/// Change one field of the checkout draft.
///
/// The error shown for that field is dropped; the others stay until the
/// next submit.
#[instrument(skip(state, session))]
pub async fn edit_field(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<FieldEditRequest>,
) -> Result<Json<CheckoutDraft>> {
    let shopper = state.shopper(&ensure_shopper_id(&session).await?).await;

    let draft = shopper.update_draft(|draft| {
        draft
            .edit(request.field, request.value)
            .map(|()| draft.clone())
    });

    Ok(Json(draft.map_err(|err| AppError::BadRequest(err.to_string()))?))
}

/// Place the order for the session's cart.
///
/// The order is placed from a snapshot of the cart. On success exactly the
/// ordered units are taken out of the cart, so anything added while the
/// order was being processed is still there afterwards. Form errors come
/// back as 422 with the same body as [`validate`] and are kept on the draft.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<Response> {
    let empty_cart = || AppError::BadRequest("cart is empty".to_string());

    let shopper = existing_shopper(&state, &session).await?.ok_or_else(empty_cart)?;
    let ordered = shopper.cart();
    if ordered.is_empty() {
        return Err(empty_cart());
    }

    shopper.update_draft(|draft| draft.replace(form.clone()));

    let outcome = shopper
        .checkout()
        .submit(&form, OrderSummary::from_cart(&ordered), |_| {
            shopper.update_cart(|cart| cart.settle(&ordered));
        })
        .await?;

    match outcome {
        SubmitOutcome::Placed(receipt) => {
            shopper.update_draft(CheckoutDraft::reset);

            let order_id = receipt.confirmation.order_id.to_string();
            add_breadcrumb(Trail::Checkout, "Order placed", &[("order_id", order_id.as_str())]);

            Ok(Json(CheckoutResponse::from(receipt)).into_response())
        }
        SubmitOutcome::Invalid(errors) => {
            shopper.update_draft(|draft| draft.set_errors(errors.clone()));

            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationResponse::from(errors)),
            )
                .into_response())
        }
    }
}
