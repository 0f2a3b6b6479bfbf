//! Integration test harness for Florist.
//!
//! Tests drive the storefront router in-process with
//! `tower::ServiceExt::oneshot`. [`TestApp`] keeps the session cookie
//! between requests the way a browser would, and the stub ports here stand
//! in for the order processor and notifier.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p florist-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use florist_core::{
    Catalog, Notification, Notifier, OrderConfirmation, OrderProcessor, OrderRequest,
    SubmissionError,
};
use florist_storefront::config::StorefrontConfig;
use florist_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::sync::Notify;
use tower::ServiceExt;

/// A storefront router plus one browser's cookie jar.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
    cookie: Arc<Mutex<Option<String>>>,
}

impl TestApp {
    /// Storefront with the built-in catalog and the given ports.
    #[must_use]
    pub fn new(processor: Arc<dyn OrderProcessor>, notifier: Arc<dyn Notifier>) -> Self {
        let state = AppState::with_ports(
            StorefrontConfig::default(),
            Catalog::builtin(),
            processor,
            notifier,
        );

        Self {
            router: florist_storefront::app(state),
            cookie: Arc::new(Mutex::new(None)),
        }
    }

    /// Storefront that accepts every order.
    #[must_use]
    pub fn accepting() -> Self {
        Self::new(
            Arc::new(AcceptingProcessor::default()),
            Arc::new(RecordingNotifier::default()),
        )
    }

    /// Another browser against the same server: same router, empty jar.
    #[must_use]
    pub fn new_browser(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: Arc::new(Mutex::new(None)),
        }
    }

    /// Send a request and return the status and the body as JSON.
    ///
    /// Plain-text bodies come back as a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(path);

        if let Some(cookie) = self.cookie() {
            request = request.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .expect("Non-ASCII cookie")
                .split(';')
                .next()
                .unwrap_or_default()
                .to_owned();
            *self.cookie.lock().unwrap_or_else(PoisonError::into_inner) = Some(pair);
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, body)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, Some(body)).await
    }

    /// The session cookie pair (`fl_session=...`), once the server set one.
    #[must_use]
    pub fn cookie(&self) -> Option<String> {
        self.cookie
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Add one unit of `product_id` to the cart.
    pub async fn add_to_cart(&self, product_id: i32) -> (StatusCode, Value) {
        self.post("/api/cart/add", json!({ "productId": product_id }))
            .await
    }

    /// Current cart item count.
    ///
    /// # Panics
    ///
    /// Panics if the count endpoint does not return a number.
    pub async fn cart_count(&self) -> u64 {
        let (_, body) = self.get("/api/cart/count").await;
        body["count"].as_u64().expect("count is a number")
    }
}

/// A checkout form that passes validation.
#[must_use]
pub fn valid_form() -> Value {
    json!({
        "name": "Anna Petrova",
        "phone": "+7 999 123-45-67",
        "email": "anna@mail.ru",
        "address": "10 Pushkin St",
        "apartment": "12",
        "deliveryTime": "today",
        "paymentMethod": "card",
        "comment": "Call before delivery"
    })
}

// =============================================================================
// Stub Ports
// =============================================================================

/// Confirms every order and counts calls.
#[derive(Debug, Default)]
pub struct AcceptingProcessor {
    calls: AtomicUsize,
}

impl AcceptingProcessor {
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderProcessor for AcceptingProcessor {
    async fn process(&self, order: &OrderRequest) -> Result<OrderConfirmation, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(OrderConfirmation::new(order.summary))
    }
}

/// Fails every order with the same error.
#[derive(Debug)]
pub struct FailingProcessor(pub SubmissionError);

#[async_trait]
impl OrderProcessor for FailingProcessor {
    async fn process(&self, _order: &OrderRequest) -> Result<OrderConfirmation, SubmissionError> {
        Err(self.0.clone())
    }
}

/// Holds each order until the test releases it.
#[derive(Debug, Default)]
pub struct GatedProcessor {
    /// Signalled when an order reaches the processor.
    pub entered: Notify,
    /// Signal to let the held order through.
    pub release: Notify,
}

#[async_trait]
impl OrderProcessor for GatedProcessor {
    async fn process(&self, order: &OrderRequest) -> Result<OrderConfirmation, SubmissionError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(OrderConfirmation::new(order.summary))
    }
}

/// Records every notification.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}
