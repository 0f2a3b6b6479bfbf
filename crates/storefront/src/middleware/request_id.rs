//! Request correlation for the storefront.
//!
//! Every request runs inside a `storefront_request` span built by
//! [`make_span`]. The span declares `request_id`, `status` and `latency_ms`
//! up front and leaves them empty; [`request_id_middleware`] fills in the ID
//! and [`record_response`] fills in the rest once the handler returns.

use std::time::Duration;

use axum::{
    extract::Request,
    http::{HeaderValue, header::HeaderName},
    middleware::Next,
    response::Response,
};
use tower_http::trace::{DefaultOnResponse, OnResponse};
use tracing::{Span, field::Empty};
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest upstream ID we pass through; anything longer gets a fresh one.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Span for one storefront request, used as the `TraceLayer` span maker.
///
/// Only the path is logged; query strings stay out of the logs.
pub fn make_span(request: &Request) -> Span {
    tracing::info_span!(
        "storefront_request",
        method = %request.method(),
        path = request.uri().path(),
        request_id = Empty,
        status = Empty,
        latency_ms = Empty,
    )
}

/// Fill in the response fields of the request span.
pub fn record_response(response: &Response, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record(
        "latency_ms",
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    );
    DefaultOnResponse::default().on_response(response, latency, span);
}

/// An upstream ID is kept if it is short, printable ASCII without spaces.
fn upstream_id(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_UPSTREAM_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
}

/// Give every request an ID and attach it to the span, Sentry and the response.
///
/// The resolved ID is also written back into the request headers, so
/// handlers see the same value whether it came from upstream or was minted
/// here.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = upstream_id(&request)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let header = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(request).await;

    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use axum::{body::Body, http::Request as HttpRequest};
    use tower::ServiceExt;
    use tracing::{
        Subscriber,
        field::{Field, Visit},
        span,
    };
    use tracing_subscriber::{
        layer::{Context, Layer, SubscriberExt},
        registry::LookupSpan,
    };

    use super::*;
    use crate::{config::StorefrontConfig, state::AppState};

    /// Collects every value recorded into a `request_id` span field.
    #[derive(Clone, Default)]
    struct RecordedIds(Arc<Mutex<Vec<String>>>);

    impl RecordedIds {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    struct RequestIdVisitor(Option<String>);

    impl Visit for RequestIdVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "request_id" {
                self.0 = Some(value.to_owned());
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "request_id" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }

    impl<S> Layer<S> for RecordedIds
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_record(&self, _id: &span::Id, values: &span::Record<'_>, _ctx: Context<'_, S>) {
            let mut visitor = RequestIdVisitor(None);
            values.record(&mut visitor);
            if let Some(id) = visitor.0 {
                self.0.lock().unwrap().push(id);
            }
        }
    }

    fn app() -> axum::Router {
        crate::app(AppState::new(StorefrontConfig::default()).unwrap())
    }

    fn health(request_id: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::get("/health");
        if let Some(id) = request_id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let response = app().oneshot(health(None)).await.unwrap();

        let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_keeps_upstream_request_id() {
        let response = app().oneshot(health(Some("edge-1234"))).await.unwrap();

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "edge-1234");
    }

    #[tokio::test]
    async fn test_replaces_oversized_upstream_id() {
        let oversized = "a".repeat(MAX_UPSTREAM_ID_LEN + 1);
        let response = app().oneshot(health(Some(&oversized))).await.unwrap();

        let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_request_id_recorded_on_request_span() {
        let recorded = RecordedIds::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let response = app().oneshot(health(Some("edge-5678"))).await.unwrap();
        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "edge-5678");
        assert_eq!(recorded.take(), vec!["edge-5678".to_string()]);

        let response = app().oneshot(health(None)).await.unwrap();
        let minted = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert_eq!(recorded.take(), vec![minted.to_str().unwrap().to_string()]);
    }
}
