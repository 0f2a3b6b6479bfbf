//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use florist_core::{CheckoutError, SubmissionError};
use serde_json::json;
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Checkout submission did not go through.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Checkout(CheckoutError::InProgress) => StatusCode::CONFLICT,
            Self::Checkout(CheckoutError::Submission(SubmissionError::Unavailable(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Checkout(CheckoutError::Submission(SubmissionError::Rejected(_))) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Session(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Session(_) => json!({ "error": "Internal server error" }),
            Self::Checkout(err) => json!({
                "error": err.to_string(),
                "retryable": err.is_retryable(),
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Which part of the shop a breadcrumb belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trail {
    Cart,
    Checkout,
    Notification,
}

impl Trail {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Checkout => "checkout",
            Self::Notification => "notification",
        }
    }
}

/// Leave a Sentry breadcrumb for a shopper action.
///
/// Server errors captured later in the same scope carry the trail of cart
/// and checkout steps that led up to them.
pub fn add_breadcrumb(trail: Trail, message: &str, data: &[(&str, &str)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(trail.as_str().to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        data: data
            .iter()
            .map(|(key, value)| ((*key).to_owned(), serde_json::Value::from(*value)))
            .collect(),
        ..Default::default()
    });
}
