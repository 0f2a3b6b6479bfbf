//! Checkout port implementations for storefront.
//!
//! # Services
//!
//! - `orders` - Order processor that simulates a round-trip to the shop
//! - `notifications` - Notifier that records notifications in logs and Sentry

pub mod notifications;
pub mod orders;

pub use notifications::TracingNotifier;
pub use orders::SimulatedOrderProcessor;
