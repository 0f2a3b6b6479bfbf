//! The checkout submission flow.
//!
//! [`CheckoutFlow`] validates the form, hands a valid order to the injected
//! [`OrderProcessor`], tells the shopper about the result through the
//! injected [`Notifier`], and refuses a second submit while one is in
//! flight. It borrows the form, so a failed submission never loses what the
//! shopper typed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::form::CheckoutForm;
use super::validation::{ValidationErrors, validate};
use crate::cart::Cart;

/// What the shopper is paying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub item_count: u64,
    /// Whole roubles.
    pub total_price: u64,
}

impl OrderSummary {
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            item_count: cart.total_count(),
            total_price: cart.total_price(),
        }
    }
}

/// An order handed to the [`OrderProcessor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub form: CheckoutForm,
    pub summary: OrderSummary,
}

/// The processor's acknowledgement of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub item_count: u64,
    pub total_price: u64,
}

impl OrderConfirmation {
    /// Confirm `summary` now under a fresh order ID.
    #[must_use]
    pub fn new(summary: OrderSummary) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            item_count: summary.item_count,
            total_price: summary.total_price,
        }
    }
}

/// Why the processor did not accept an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The processor could not be reached or timed out. Retrying may work.
    #[error("order processing is temporarily unavailable: {0}")]
    Unavailable(String),

    /// The processor refused the order. Retrying the same order will not help.
    #[error("order was rejected: {0}")]
    Rejected(String),
}

impl SubmissionError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Accepts orders on behalf of the shop.
#[async_trait]
pub trait OrderProcessor: Send + Sync {
    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmissionError`] when the order was not accepted.
    async fn process(&self, order: &OrderRequest) -> Result<OrderConfirmation, SubmissionError>;
}

/// A message for the shopper, e.g. a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn order_placed() -> Self {
        Self {
            title: "Order placed!".to_string(),
            message: "We will contact you shortly".to_string(),
        }
    }
}

/// Delivers notifications to the shopper. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Whether a submission is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
}

/// Proof of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub confirmation: OrderConfirmation,
    pub notification: Notification,
}

/// How a submit ended when nothing went wrong on the processor side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The order was accepted.
    Placed(Receipt),
    /// The form has errors; nothing was submitted.
    Invalid(ValidationErrors),
}

/// Errors returned by [`CheckoutFlow::submit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Another submit on this flow has not finished yet.
    #[error("an order submission is already in progress")]
    InProgress,

    /// The processor did not accept the order.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl CheckoutError {
    /// Whether submitting the same form again later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::InProgress => true,
            Self::Submission(err) => err.is_retryable(),
        }
    }
}

/// Coordinates validation, processing and notification for one shopper.
pub struct CheckoutFlow {
    processor: Arc<dyn OrderProcessor>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<SubmissionState>,
}

impl std::fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CheckoutFlow {
    #[must_use]
    pub fn new(processor: Arc<dyn OrderProcessor>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            processor,
            notifier,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState {
        *lock(&self.state)
    }

    /// Submit the checkout form.
    ///
    /// An invalid form returns [`SubmitOutcome::Invalid`] without touching
    /// the processor. A valid one is processed; on success the shopper is
    /// notified and `on_success` runs exactly once before the receipt is
    /// returned. The flow is back to [`SubmissionState::Idle`] when this
    /// returns, or if the returned future is dropped early.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InProgress`] if a submit is already in flight.
    /// - [`CheckoutError::Submission`] if the processor refused the order.
    pub async fn submit<F>(
        &self,
        form: &CheckoutForm,
        summary: OrderSummary,
        on_success: F,
    ) -> Result<SubmitOutcome, CheckoutError>
    where
        F: FnOnce(&OrderConfirmation) + Send,
    {
        if self.state() == SubmissionState::Submitting {
            tracing::warn!("Checkout submit ignored, another submission is in flight");
            return Err(CheckoutError::InProgress);
        }

        let errors = validate(form);
        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "Checkout form has errors");
            return Ok(SubmitOutcome::Invalid(errors));
        }

        let Some(_in_flight) = InFlight::begin(&self.state) else {
            tracing::warn!("Checkout submit ignored, another submission is in flight");
            return Err(CheckoutError::InProgress);
        };

        tracing::info!(
            item_count = summary.item_count,
            total_price = summary.total_price,
            "Submitting order"
        );

        let order = OrderRequest {
            form: form.clone(),
            summary,
        };

        match self.processor.process(&order).await {
            Ok(confirmation) => {
                let notification = Notification::order_placed();
                self.notifier.notify(&notification);
                on_success(&confirmation);

                tracing::info!(order_id = %confirmation.order_id, "Order placed");
                Ok(SubmitOutcome::Placed(Receipt {
                    confirmation,
                    notification,
                }))
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    retryable = err.is_retryable(),
                    "Order submission failed"
                );
                Err(err.into())
            }
        }
    }
}

/// Marks a flow as submitting until dropped.
struct InFlight<'a> {
    state: &'a Mutex<SubmissionState>,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a Mutex<SubmissionState>) -> Option<Self> {
        let mut current = lock(state);
        if *current == SubmissionState::Submitting {
            return None;
        }
        *current = SubmissionState::Submitting;
        Some(Self { state })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *lock(self.state) = SubmissionState::Idle;
    }
}

// The state is a plain enum, so a poisoned lock still holds a usable value.
fn lock(state: &Mutex<SubmissionState>) -> MutexGuard<'_, SubmissionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use super::*;
    use crate::checkout::form::Field;

    /// Confirms every order and counts calls.
    #[derive(Default)]
    struct AcceptingProcessor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OrderProcessor for AcceptingProcessor {
        async fn process(
            &self,
            order: &OrderRequest,
        ) -> Result<OrderConfirmation, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(OrderConfirmation::new(order.summary))
        }
    }

    struct FailingProcessor(SubmissionError);

    #[async_trait]
    impl OrderProcessor for FailingProcessor {
        async fn process(&self, _: &OrderRequest) -> Result<OrderConfirmation, SubmissionError> {
            Err(self.0.clone())
        }
    }

    /// Holds every order until released.
    #[derive(Default)]
    struct GatedProcessor {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OrderProcessor for GatedProcessor {
        async fn process(
            &self,
            order: &OrderRequest,
        ) -> Result<OrderConfirmation, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(OrderConfirmation::new(order.summary))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: &Notification) {
            self.seen.lock().unwrap().push(notification.clone());
        }
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            name: "Anna".to_string(),
            phone: "+7 999 123-45-67".to_string(),
            address: "10 Pushkin St".to_string(),
            ..CheckoutForm::default()
        }
    }

    const SUMMARY: OrderSummary = OrderSummary {
        item_count: 3,
        total_price: 11_200,
    };

    #[tokio::test]
    async fn test_valid_submit_places_order_once() {
        let processor = Arc::new(AcceptingProcessor::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let flow = CheckoutFlow::new(processor.clone(), notifier.clone());
        let mut callbacks = 0;

        let outcome = flow
            .submit(&valid_form(), SUMMARY, |_| callbacks += 1)
            .await
            .unwrap();

        let SubmitOutcome::Placed(receipt) = outcome else {
            panic!("expected a placed order");
        };
        assert_eq!(receipt.confirmation.total_price, 11_200);
        assert_eq!(receipt.confirmation.item_count, 3);
        assert_eq!(receipt.notification, Notification::order_placed());
        assert_eq!(callbacks, 1);
        assert_eq!(processor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.seen.lock().unwrap().len(), 1);
        assert_eq!(flow.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_processor() {
        let processor = Arc::new(AcceptingProcessor::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let flow = CheckoutFlow::new(processor.clone(), notifier.clone());
        let mut called = false;

        let outcome = flow
            .submit(&CheckoutForm::default(), SUMMARY, |_| called = true)
            .await
            .unwrap();

        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation errors");
        };
        assert!(errors.contains(Field::Name));
        assert!(!called);
        assert_eq!(processor.calls.load(Ordering::SeqCst), 0);
        assert!(notifier.seen.lock().unwrap().is_empty());
        assert_eq!(flow.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_processor_failure_returns_to_idle() {
        let notifier = Arc::new(RecordingNotifier::default());
        let flow = CheckoutFlow::new(
            Arc::new(FailingProcessor(SubmissionError::Unavailable(
                "timeout".to_string(),
            ))),
            notifier.clone(),
        );
        let mut called = false;

        let err = flow
            .submit(&valid_form(), SUMMARY, |_| called = true)
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(
            err,
            CheckoutError::Submission(SubmissionError::Unavailable(_))
        ));
        assert!(!called);
        assert!(notifier.seen.lock().unwrap().is_empty());
        assert_eq!(flow.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_rejection_is_not_retryable() {
        let flow = CheckoutFlow::new(
            Arc::new(FailingProcessor(SubmissionError::Rejected(
                "address outside delivery area".to_string(),
            ))),
            Arc::new(RecordingNotifier::default()),
        );

        let err = flow.submit(&valid_form(), SUMMARY, |_| {}).await.unwrap_err();

        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_duplicate_submit_is_refused_while_in_flight() {
        let processor = Arc::new(GatedProcessor::default());
        let flow = Arc::new(CheckoutFlow::new(
            processor.clone(),
            Arc::new(RecordingNotifier::default()),
        ));

        let first = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.submit(&valid_form(), SUMMARY, |_| {}).await }
        });

        processor.entered.notified().await;
        assert_eq!(flow.state(), SubmissionState::Submitting);

        let second = flow.submit(&valid_form(), SUMMARY, |_| {}).await;
        assert_eq!(second, Err(CheckoutError::InProgress));

        processor.release.notify_one();
        let first = first.await.unwrap().unwrap();

        assert!(matches!(first, SubmitOutcome::Placed(_)));
        assert_eq!(processor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(flow.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_dropped_submit_returns_to_idle() {
        let processor = Arc::new(GatedProcessor::default());
        let flow = Arc::new(CheckoutFlow::new(
            processor.clone(),
            Arc::new(RecordingNotifier::default()),
        ));

        let pending = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.submit(&valid_form(), SUMMARY, |_| {}).await }
        });

        processor.entered.notified().await;
        pending.abort();
        let _ = pending.await;

        assert_eq!(flow.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_on_success_can_clear_the_cart() {
        let flow = CheckoutFlow::new(
            Arc::new(AcceptingProcessor::default()),
            Arc::new(RecordingNotifier::default()),
        );
        let catalog = crate::catalog::Catalog::builtin();
        let mut cart = Cart::new();
        for product in catalog.iter().take(2) {
            cart.add(product);
        }
        let summary = OrderSummary::from_cart(&cart);

        flow.submit(&valid_form(), summary, |_| cart.clear())
            .await
            .unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_summary_from_cart() {
        let catalog = crate::catalog::Catalog::builtin();
        let mut cart = Cart::new();
        let first = catalog.iter().next().unwrap();
        cart.add(first);
        cart.add(first);

        let summary = OrderSummary::from_cart(&cart);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_price, 7000);
    }
}
