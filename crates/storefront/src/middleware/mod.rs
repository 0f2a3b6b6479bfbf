//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors, added by the binary)
//! 2. `TraceLayer` (one `storefront_request` span per request)
//! 3. Request ID (fills the span's `request_id` field)
//! 4. Session layer (tower-sessions with in-memory store)

pub mod request_id;
pub mod session;

pub use request_id::{make_span, record_response, request_id_middleware};
pub use session::create_session_layer;
