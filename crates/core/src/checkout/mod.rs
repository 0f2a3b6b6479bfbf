//! Checkout: the order form, its validator and the submission flow.
//!
//! ```text
//!             submit (form invalid)
//!        ┌──────────────────────────┐
//!        ▼                          │
//!      Idle ──── submit (valid) ──► Submitting ──► processor ok ──► notify, on_success ──► Idle
//!        ▲                                     └─► processor err ──────────────────────► Idle
//!        └── InProgress returned to any submit made while Submitting
//! ```

pub mod draft;
pub mod form;
pub mod submission;
pub mod validation;

pub use draft::CheckoutDraft;
pub use form::{CheckoutForm, DeliveryTime, Field, InvalidOption, PaymentMethod, UnknownField};
pub use submission::{
    CheckoutError, CheckoutFlow, Notification, Notifier, OrderConfirmation, OrderProcessor,
    OrderRequest, OrderSummary, Receipt, SubmissionError, SubmissionState, SubmitOutcome,
};
pub use validation::{ValidationErrors, validate};
