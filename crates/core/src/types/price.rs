//! Catalog prices.
//!
//! Bouquet prices are authored as localized display strings such as
//! `"3 500 ₽"`. The numeric amount is recovered by dropping every character
//! that is not an ASCII digit, so `"3 500 ₽"` is worth 3500 roubles.
//!
//! This parse is lossy: it has no notion of decimal separators, and a string
//! with several digit groups (`"1 500 – 2 000 ₽"`) collapses them into one
//! number (`15002000`). Catalog prices are whole roubles with thousands
//! separators only, and carts have always been totalled this way.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The rouble glyph appended to rendered amounts.
pub const RUBLE_SIGN: char = '₽';

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The display string contains no digits at all.
    #[error("price \"{0}\" contains no digits")]
    NoDigits(String),
    /// The digits do not fit in a `u64`.
    #[error("price \"{0}\" is too large")]
    TooLarge(String),
}

/// A catalog price: the string shown to shoppers plus its parsed amount.
///
/// Serializes as the display string.
///
/// ```
/// use florist_core::Price;
///
/// let price = Price::parse("3 500 ₽").unwrap();
/// assert_eq!(price.amount(), 3500);
/// assert_eq!(price.display(), "3 500 ₽");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price {
    display: String,
    amount: u64,
}

impl Price {
    /// Parse a price from its display string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string has no digits or the digits overflow `u64`.
    pub fn parse(display: &str) -> Result<Self, PriceError> {
        let digits: String = display.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PriceError::NoDigits(display.to_owned()));
        }

        let amount = digits
            .parse::<u64>()
            .map_err(|_| PriceError::TooLarge(display.to_owned()))?;

        Ok(Self {
            display: display.to_owned(),
            amount,
        })
    }

    /// A price for a whole-rouble amount, displayed as [`format_rubles`] renders it.
    #[must_use]
    pub fn rubles(amount: u64) -> Self {
        Self {
            display: format_rubles(amount),
            amount,
        }
    }

    /// The string shown next to the product.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The amount in whole roubles.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.amount
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Price {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.display
    }
}

/// Render an amount the way the shop shows totals: digits grouped in
/// threes by a space, then a space and the rouble glyph.
///
/// ```
/// use florist_core::format_rubles;
///
/// assert_eq!(format_rubles(11_200), "11 200 ₽");
/// assert_eq!(format_rubles(0), "0 ₽");
/// ```
#[must_use]
pub fn format_rubles(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }

    out.push(' ');
    out.push(RUBLE_SIGN);
    out
}
