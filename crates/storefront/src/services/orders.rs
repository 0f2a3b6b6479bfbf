//! Simulated order processing.
//!
//! Orders are not sent anywhere. The processor waits for the configured
//! latency, then confirms the order under a fresh ID, which is what the
//! shopper would see from a real back office.

use std::time::Duration;

use async_trait::async_trait;
use florist_core::{OrderConfirmation, OrderProcessor, OrderRequest, SubmissionError};
use tracing::instrument;

/// Confirms every non-empty order after a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedOrderProcessor {
    delay: Duration,
}

impl SimulatedOrderProcessor {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl OrderProcessor for SimulatedOrderProcessor {
    #[instrument(skip(self, order), fields(items = order.summary.item_count))]
    async fn process(&self, order: &OrderRequest) -> Result<OrderConfirmation, SubmissionError> {
        if order.summary.item_count == 0 {
            return Err(SubmissionError::Rejected("order has no items".to_string()));
        }

        tokio::time::sleep(self.delay).await;

        let confirmation = OrderConfirmation::new(order.summary);
        tracing::debug!(order_id = %confirmation.order_id, "Simulated order confirmed");
        Ok(confirmation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use florist_core::{CheckoutForm, OrderSummary};

    use super::*;

    fn order(item_count: u64, total_price: u64) -> OrderRequest {
        OrderRequest {
            form: CheckoutForm::default(),
            summary: OrderSummary {
                item_count,
                total_price,
            },
        }
    }

    #[tokio::test]
    async fn test_confirms_order_summary() {
        let processor = SimulatedOrderProcessor::new(Duration::ZERO);
        let confirmation = processor.process(&order(3, 11_200)).await.unwrap();

        assert_eq!(confirmation.item_count, 3);
        assert_eq!(confirmation.total_price, 11_200);
    }

    #[tokio::test]
    async fn test_fresh_order_ids() {
        let processor = SimulatedOrderProcessor::new(Duration::ZERO);
        let first = processor.process(&order(1, 3500)).await.unwrap();
        let second = processor.process(&order(1, 3500)).await.unwrap();

        assert_ne!(first.order_id, second.order_id);
    }

    #[tokio::test]
    async fn test_rejects_empty_order() {
        let processor = SimulatedOrderProcessor::new(Duration::ZERO);
        let err = processor.process(&order(0, 0)).await.unwrap_err();

        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_waits_for_delay() {
        let processor = SimulatedOrderProcessor::new(Duration::from_millis(20));
        let started = tokio::time::Instant::now();

        processor.process(&order(1, 3500)).await.unwrap();

        assert!(started.elapsed() >= processor.delay());
    }
}
