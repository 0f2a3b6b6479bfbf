//! Florist Core - catalog, cart and checkout logic.
//!
//! This crate holds everything the storefront knows about selling flowers:
//! - [`catalog`] - The static list of bouquets offered by the shop
//! - [`cart`] - The per-session cart manager and price rendering
//! - [`checkout`] - The checkout form, its validator and the submission flow
//! - [`types`] - Newtype wrappers for product IDs, prices and emails
//!
//! # Architecture
//!
//! The core crate contains only types, pure logic and the ports the checkout
//! flow talks to - no HTTP, no file I/O, no timers. Presentation layers
//! (the `storefront` HTTP adapter, the `cli`) own the cart and the checkout
//! draft and inject the order processor and notifier implementations.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{Cart, CartLine, format_rubles};
pub use catalog::{Catalog, CatalogError, Product};
pub use checkout::{
    CheckoutDraft, CheckoutError, CheckoutFlow, CheckoutForm, DeliveryTime, Field, InvalidOption,
    Notification, Notifier, OrderConfirmation, OrderProcessor, OrderRequest, OrderSummary,
    PaymentMethod, Receipt, SubmissionError, SubmissionState, SubmitOutcome, UnknownField,
    ValidationErrors, validate,
};
pub use types::*;
