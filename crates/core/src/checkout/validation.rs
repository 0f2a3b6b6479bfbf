//! Checkout form validation.
//!
//! Validation never fails: it returns the per-field messages to show next
//! to the form, and an empty set means the form can be submitted.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::form::{CheckoutForm, Field};
use crate::types::Email;

/// ASCII digits, whitespace, `+`, `-`, `(` and `)`.
static PHONE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s+\-()]+$").expect("Invalid regex"));

pub const NAME_REQUIRED: &str = "Please provide your name";
pub const PHONE_REQUIRED: &str = "Please provide a phone number";
pub const PHONE_INVALID: &str = "Invalid phone number format";
pub const EMAIL_INVALID: &str = "Invalid email format";
pub const ADDRESS_REQUIRED: &str = "Please provide a delivery address";

/// Field-scoped validation messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when the form passed every rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Drop the message for a field the shopper has just edited.
    pub fn clear_field(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_owned());
    }
}

/// Check a checkout form.
///
/// Every rule runs; one failing field never hides another. Apartment,
/// delivery time, payment method and comment are not constrained.
#[must_use]
pub fn validate(form: &CheckoutForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if form.name.trim().is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED);
    }

    if form.phone.trim().is_empty() {
        errors.insert(Field::Phone, PHONE_REQUIRED);
    } else if !PHONE_CHARS.is_match(&form.phone) {
        errors.insert(Field::Phone, PHONE_INVALID);
    }

    // Optional: only checked when something was typed.
    if !form.email.is_empty() && Email::parse(&form.email).is_err() {
        errors.insert(Field::Email, EMAIL_INVALID);
    }

    if form.address.trim().is_empty() {
        errors.insert(Field::Address, ADDRESS_REQUIRED);
    }

    errors
}
