//! The checkout form.
//!
//! Field names on the wire are camelCase (`deliveryTime`, `paymentMethod`)
//! so a form posted by the browser deserializes as-is.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// When the bouquet should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryTime {
    #[default]
    Asap,
    Today,
    Tomorrow,
}

impl DeliveryTime {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asap => "asap",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
        }
    }
}

impl fmt::Display for DeliveryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryTime {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asap" => Ok(Self::Asap),
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            _ => Err(InvalidOption {
                field: Field::DeliveryTime,
                value: s.to_owned(),
            }),
        }
    }
}

/// How the customer pays on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            _ => Err(InvalidOption {
                field: Field::PaymentMethod,
                value: s.to_owned(),
            }),
        }
    }
}

/// A checkout form field, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Phone,
    Email,
    Address,
    Apartment,
    DeliveryTime,
    PaymentMethod,
    Comment,
}

impl Field {
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::Phone,
        Self::Email,
        Self::Address,
        Self::Apartment,
        Self::DeliveryTime,
        Self::PaymentMethod,
        Self::Comment,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Address => "address",
            Self::Apartment => "apartment",
            Self::DeliveryTime => "deliveryTime",
            Self::PaymentMethod => "paymentMethod",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field name that is not part of the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown checkout field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_owned()))
    }
}

/// A value that is not one of a choice field's options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value \"{value}\" for {field}")]
pub struct InvalidOption {
    pub field: Field,
    pub value: String,
}

/// Everything the shopper fills in at checkout.
///
/// Optional text fields are empty strings when left blank. Missing keys
/// deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    /// Optional.
    pub email: String,
    pub address: String,
    /// Optional.
    pub apartment: String,
    pub delivery_time: DeliveryTime,
    pub payment_method: PaymentMethod,
    /// Optional.
    pub comment: String,
}

impl CheckoutForm {
    /// Apply a single edit, as a form control would.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOption`] when a choice field gets a value that is not
    /// one of its options. The form is left unchanged in that case.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), InvalidOption> {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Email => self.email = value,
            Field::Address => self.address = value,
            Field::Apartment => self.apartment = value,
            Field::Comment => self.comment = value,
            Field::DeliveryTime => self.delivery_time = value.parse()?,
            Field::PaymentMethod => self.payment_method = value.parse()?,
        }
        Ok(())
    }
}
