//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// `local@domain.tld` with no whitespace and exactly one `@`.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input is not shaped like `local@domain.tld`.
    #[error("email must look like name@example.com")]
    InvalidFormat,
}

/// An email address.
///
/// ## Constraints
///
/// - Must not be empty
/// - No whitespace anywhere
/// - Exactly one @ symbol with a non-empty local part
/// - The domain contains a dot with text on both sides
///
/// ## Examples
///
/// ```
/// use florist_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());             // empty
/// assert!(Email::parse("not-an-email").is_err());  // missing @
/// assert!(Email::parse("user@localhost").is_err()); // no dot in domain
/// assert!(Email::parse("a b@c.d").is_err());       // whitespace
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// The input is taken as-is; callers decide whether to trim.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not shaped like an address.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if !EMAIL_SHAPE.is_match(s) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
