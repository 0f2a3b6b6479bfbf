//! A checkout form in progress.
//!
//! The draft keeps what the shopper has typed so far next to the errors from
//! the last check. Editing a field clears that field's error straight away;
//! the other errors stay until the form is checked again.

use serde::Serialize;

use super::form::{CheckoutForm, Field, InvalidOption};
use super::validation::{ValidationErrors, validate};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutDraft {
    form: CheckoutForm,
    errors: ValidationErrors,
}

impl CheckoutDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Errors from the last [`check`](Self::check), minus fields edited since.
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Apply one edit and drop the error shown for that field.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOption`] for a choice field given a value outside its
    /// options. The draft is left unchanged in that case, error included.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) -> Result<(), InvalidOption> {
        self.form.set_field(field, value)?;
        self.errors.clear_field(field);
        Ok(())
    }

    /// Replace the whole form, keeping the errors until the next check.
    pub fn replace(&mut self, form: CheckoutForm) {
        self.form = form;
    }

    /// Validate the whole form and remember the result.
    ///
    /// Returns `true` when the form can be submitted.
    pub fn check(&mut self) -> bool {
        self.errors = validate(&self.form);
        self.errors.is_empty()
    }

    /// Record errors found elsewhere, such as by a failed submit.
    pub fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    /// Start over with an empty form, as after a placed order.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::validation::{ADDRESS_REQUIRED, NAME_REQUIRED, PHONE_REQUIRED};

    #[test]
    fn test_edit_clears_only_that_field() {
        let mut draft = CheckoutDraft::new();
        assert!(!draft.check());
        assert_eq!(draft.errors().len(), 3);

        draft.edit(Field::Name, "Anna").unwrap();

        assert!(!draft.errors().contains(Field::Name));
        assert_eq!(draft.errors().get(Field::Phone), Some(PHONE_REQUIRED));
        assert_eq!(draft.errors().get(Field::Address), Some(ADDRESS_REQUIRED));
        assert_eq!(draft.form().name, "Anna");
    }

    #[test]
    fn test_edit_clears_error_even_when_value_still_invalid() {
        let mut draft = CheckoutDraft::new();
        draft.check();

        draft.edit(Field::Name, "   ").unwrap();
        assert!(!draft.errors().contains(Field::Name));

        assert!(!draft.check());
        assert_eq!(draft.errors().get(Field::Name), Some(NAME_REQUIRED));
    }

    #[test]
    fn test_rejected_edit_keeps_form_and_errors() {
        let mut draft = CheckoutDraft::new();
        draft.check();
        let before = draft.clone();

        assert!(draft.edit(Field::PaymentMethod, "crypto").is_err());

        assert_eq!(draft, before);
    }

    #[test]
    fn test_check_passes_after_filling_required_fields() {
        let mut draft = CheckoutDraft::new();
        draft.edit(Field::Name, "Anna Petrova").unwrap();
        draft.edit(Field::Phone, "+7 999 123-45-67").unwrap();
        draft.edit(Field::Address, "10 Pushkin St").unwrap();

        assert!(draft.check());
        assert!(draft.errors().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut draft = CheckoutDraft::new();
        draft.edit(Field::Comment, "Ring twice").unwrap();
        draft.check();

        draft.reset();

        assert_eq!(draft, CheckoutDraft::new());
    }
}
