//! Shopper models: what the session points at and where it lives.

pub mod session;
pub mod shopper;

pub use shopper::Shopper;
