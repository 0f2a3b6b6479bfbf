//! Integration tests for the checkout flow wired to the default ports.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use florist_core::{
    Cart, Catalog, CheckoutError, CheckoutFlow, CheckoutForm, OrderSummary, ProductId,
    SubmissionState, SubmitOutcome,
};
use florist_storefront::services::{SimulatedOrderProcessor, TracingNotifier};

fn flow(delay: Duration) -> Arc<CheckoutFlow> {
    Arc::new(CheckoutFlow::new(
        Arc::new(SimulatedOrderProcessor::new(delay)),
        Arc::new(TracingNotifier),
    ))
}

fn form() -> CheckoutForm {
    CheckoutForm {
        name: "Anna Petrova".to_string(),
        phone: "+7 999 123-45-67".to_string(),
        address: "10 Pushkin St".to_string(),
        ..CheckoutForm::default()
    }
}

fn filled_cart() -> Cart {
    let catalog = Catalog::builtin();
    let mut cart = Cart::new();
    cart.add(catalog.get(ProductId::new(3)).unwrap());
    cart.add(catalog.get(ProductId::new(2)).unwrap());
    cart.add(catalog.get(ProductId::new(2)).unwrap());
    cart
}

#[tokio::test]
async fn test_simulated_order_clears_cart() {
    let flow = flow(Duration::ZERO);
    let mut cart = filled_cart();
    let summary = OrderSummary::from_cart(&cart);

    let outcome = flow
        .submit(&form(), summary, |_| cart.clear())
        .await
        .unwrap();

    let SubmitOutcome::Placed(receipt) = outcome else {
        panic!("expected a placed order");
    };
    assert_eq!(receipt.confirmation.item_count, 3);
    assert_eq!(receipt.confirmation.total_price, 11_200);
    assert!(cart.is_empty());
    assert_eq!(flow.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn test_second_submit_during_processing() {
    let flow = flow(Duration::from_millis(200));
    let cart = filled_cart();
    let summary = OrderSummary::from_cart(&cart);

    let first = tokio::spawn({
        let flow = Arc::clone(&flow);
        async move { flow.submit(&form(), summary, |_| {}).await }
    });

    while flow.state() != SubmissionState::Submitting {
        tokio::task::yield_now().await;
    }

    let second = flow.submit(&form(), summary, |_| {}).await;
    assert!(matches!(second, Err(CheckoutError::InProgress)));

    assert!(matches!(
        first.await.unwrap(),
        Ok(SubmitOutcome::Placed(_))
    ));
    assert_eq!(flow.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn test_invalid_form_never_waits() {
    let flow = flow(Duration::from_secs(3600));
    let summary = OrderSummary::from_cart(&filled_cart());

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        flow.submit(&CheckoutForm::default(), summary, |_| {}),
    )
    .await
    .unwrap()
    .unwrap();

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.len(), 3);
}
