//! Field and record validation.
//!
//! Two stages run at different times:
//!
//! 1. **Per edit** - [`validate_field`] / [`field_flag`] check the format of
//!    a single text field. Empty values pass; length is not checked yet.
//! 2. **On submit** - [`validate_record`] checks the whole record in a fixed
//!    order and stops at the first failure, so the user fixes one problem at
//!    a time. [`validate_record_all`] reports every failure instead.
//!
//! # Example
//!
//! ```
//! use card_form::{validate_field, validate_record, FieldKey, Record, TextField};
//!
//! assert!(validate_field(TextField::CardNumber, "44a4"));
//! assert!(!validate_field(TextField::CardNumber, ""));
//!
//! let mut record = Record::new();
//! record.card_number = "123".into();
//! let report = validate_record(&record);
//! assert!(!report.is_valid());
//! assert_eq!(report.flagged_keys(), vec![FieldKey::CardNumber]);
//! ```

use crate::catalog::{ExpirationPart, FieldKey, TextField};
use crate::error::RecordError;
use crate::record::Record;

/// How many failures a submit-time validation collects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValidationMode {
    /// Stop at the first failing field.
    #[default]
    FirstFailure,
    /// Check every field and report all failures.
    AllFailures,
}

/// A failed submit-time check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldFailure {
    /// The field that failed.
    pub field: FieldKey,
    /// Why it failed.
    pub error: RecordError,
}

/// Outcome of a submit-time validation.
///
/// The report is a patch for the error state: it lists the fields to flag and
/// says nothing about the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecordReport {
    failures: Vec<FieldFailure>,
}

impl RecordReport {
    /// Returns true if no check failed.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the failures in check order.
    #[inline]
    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// Returns the first failure, if any.
    #[inline]
    pub fn first(&self) -> Option<&FieldFailure> {
        self.failures.first()
    }

    /// Returns true if the given field failed.
    pub fn flagged(&self, key: FieldKey) -> bool {
        self.failures.iter().any(|f| f.field == key)
    }

    /// Returns the failed fields in check order.
    pub fn flagged_keys(&self) -> Vec<FieldKey> {
        self.failures.iter().map(|f| f.field).collect()
    }

    /// Returns the error recorded for a field.
    pub fn error(&self, key: FieldKey) -> Option<&RecordError> {
        self.failures
            .iter()
            .find(|f| f.field == key)
            .map(|f| &f.error)
    }
}

/// Returns the error flag for a text field while the user is typing.
///
/// - Card number and CVC: `true` iff the value is non-empty and contains a
///   character that is not an ASCII digit.
/// - Card holder name: always `false`. Typing can only clear the name flag,
///   see [`field_flag`].
#[inline]
pub fn validate_field(field: TextField, value: &str) -> bool {
    match field {
        TextField::CardNumber | TextField::Cvc => check_digits(value).is_err(),
        TextField::CardHolderName => false,
    }
}

/// Returns the flag update an edit should merge into the error state.
///
/// `None` means the current flag stays as it is. The card holder name flag
/// is only ever cleared by typing, never set.
#[inline]
pub fn field_flag(field: TextField, value: &str) -> Option<bool> {
    match field {
        TextField::CardNumber | TextField::Cvc => Some(validate_field(field, value)),
        TextField::CardHolderName if !value.is_empty() => Some(false),
        TextField::CardHolderName => None,
    }
}

/// Checks one field of a record with the submit-time rules.
pub fn check_field(key: FieldKey, record: &Record) -> Result<(), RecordError> {
    let value = record.value(key);
    match key {
        FieldKey::CardNumber => check_numeric(value, TextField::CardNumber.max_length()),
        FieldKey::Cvc => check_numeric(value, TextField::Cvc.max_length()),
        FieldKey::CardHolderName => check_required(value),
        FieldKey::ExpirationMonth => check_selection(ExpirationPart::Month, value),
        FieldKey::ExpirationYear => check_selection(ExpirationPart::Year, value),
    }
}

/// Validates a whole record, stopping at the first failure.
///
/// Checks run in [`FieldKey::ALL`] order: card number (16 digits), CVC
/// (3 digits), card holder name (non-empty), month, then year (selected).
pub fn validate_record(record: &Record) -> RecordReport {
    validate_record_with(record, ValidationMode::FirstFailure)
}

/// Validates a whole record and reports every failing field.
pub fn validate_record_all(record: &Record) -> RecordReport {
    validate_record_with(record, ValidationMode::AllFailures)
}

/// Validates a whole record in the given mode.
pub fn validate_record_with(record: &Record, mode: ValidationMode) -> RecordReport {
    let mut failures = Vec::new();

    for key in FieldKey::ALL {
        if let Err(error) = check_field(key, record) {
            failures.push(FieldFailure { field: key, error });
            if mode == ValidationMode::FirstFailure {
                break;
            }
        }
    }

    RecordReport { failures }
}

/// Returns true if the record passes every submit-time check.
#[inline]
pub fn is_valid_record(record: &Record) -> bool {
    validate_record(record).is_valid()
}

fn check_digits(value: &str) -> Result<(), RecordError> {
    match value.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
        Some((position, character)) => Err(RecordError::InvalidCharacter {
            position,
            character,
        }),
        None => Ok(()),
    }
}

fn check_numeric(value: &str, expected: usize) -> Result<(), RecordError> {
    check_required(value)?;
    check_digits(value)?;

    // Digits only past this point, so bytes == characters
    if value.len() != expected {
        return Err(RecordError::WrongLength {
            length: value.len(),
            expected,
        });
    }
    Ok(())
}

fn check_required(value: &str) -> Result<(), RecordError> {
    if value.is_empty() {
        return Err(RecordError::Required);
    }
    Ok(())
}

fn check_selection(part: ExpirationPart, value: &str) -> Result<(), RecordError> {
    check_required(value)?;
    if !part.is_option(value) {
        return Err(RecordError::UnknownOption);
    }
    Ok(())
}
