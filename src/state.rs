//! Per-field error flags shown next to the inputs.

use crate::catalog::{ExpirationPart, FieldKey, TextField};
use crate::validate::RecordReport;

/// Error flag of a text field together with its static message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldFlag {
    /// Whether the field is currently flagged.
    pub error: bool,
    /// Message shown while flagged.
    pub message: &'static str,
}

impl FieldFlag {
    const fn new(field: TextField) -> Self {
        Self {
            error: false,
            message: field.error_message(),
        }
    }
}

/// Error flags of the expiration selectors. They carry no message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExpirationFlags {
    /// Month selector flag.
    pub month: bool,
    /// Year selector flag.
    pub year: bool,
}

/// Error state mirroring the shape of a [`Record`](crate::Record).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorState {
    /// Card number flag.
    pub card_number: FieldFlag,
    /// CVC flag.
    pub cvc: FieldFlag,
    /// Card holder name flag.
    pub card_holder_name: FieldFlag,
    /// Expiration selector flags.
    pub expiration: ExpirationFlags,
}

impl Default for ErrorState {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorState {
    /// Creates an error state with every flag cleared.
    pub const fn new() -> Self {
        Self {
            card_number: FieldFlag::new(TextField::CardNumber),
            cvc: FieldFlag::new(TextField::Cvc),
            card_holder_name: FieldFlag::new(TextField::CardHolderName),
            expiration: ExpirationFlags {
                month: false,
                year: false,
            },
        }
    }

    /// Returns the flag of a leaf field.
    pub fn flag(&self, key: FieldKey) -> bool {
        match key {
            FieldKey::CardNumber => self.card_number.error,
            FieldKey::Cvc => self.cvc.error,
            FieldKey::CardHolderName => self.card_holder_name.error,
            FieldKey::ExpirationMonth => self.expiration.month,
            FieldKey::ExpirationYear => self.expiration.year,
        }
    }

    /// Sets the flag of a leaf field.
    pub fn set(&mut self, key: FieldKey, error: bool) {
        match key {
            FieldKey::CardNumber => self.card_number.error = error,
            FieldKey::Cvc => self.cvc.error = error,
            FieldKey::CardHolderName => self.card_holder_name.error = error,
            FieldKey::ExpirationMonth => self.expiration.month = error,
            FieldKey::ExpirationYear => self.expiration.year = error,
        }
    }

    /// Returns the flag and message of a text field.
    pub fn text(&self, field: TextField) -> FieldFlag {
        match field {
            TextField::CardNumber => self.card_number,
            TextField::Cvc => self.cvc,
            TextField::CardHolderName => self.card_holder_name,
        }
    }

    /// Returns the flag of an expiration selector.
    pub fn expiration(&self, part: ExpirationPart) -> bool {
        self.flag(part.into())
    }

    /// Returns the message to show for a text field, if it is flagged.
    pub fn message(&self, field: TextField) -> Option<&'static str> {
        let flag = self.text(field);
        flag.error.then_some(flag.message)
    }

    /// Flags every field that failed in `report`. Other flags are untouched.
    pub fn apply(&mut self, report: &RecordReport) {
        for failure in report.failures() {
            self.set(failure.field, true);
        }
    }

    /// Returns true if any field is flagged.
    pub fn any(&self) -> bool {
        FieldKey::ALL.iter().any(|&key| self.flag(key))
    }

    /// Returns the flagged fields in check order.
    pub fn flagged(&self) -> Vec<FieldKey> {
        FieldKey::ALL
            .into_iter()
            .filter(|&key| self.flag(key))
            .collect()
    }

    /// Clears every flag.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
