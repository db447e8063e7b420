//! Error types for the card form.
//!
//! Field problems are reported as [`RecordError`]s and surface to the user as
//! flags in the [`ErrorState`](crate::state::ErrorState). Submission problems
//! are kept apart from field problems.

use std::fmt;

use crate::catalog::ExpirationPart;
use crate::validate::RecordReport;

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum RecordError {
    /// The field is empty but must be filled before submitting.
    Required,

    /// A numeric field contains something other than a digit.
    InvalidCharacter {
        /// Position in the value (0-indexed, in characters).
        position: usize,
        /// The offending character.
        character: char,
    },

    /// A numeric field has the wrong number of digits.
    WrongLength {
        /// The actual number of characters.
        length: usize,
        /// The required number of characters.
        expected: usize,
    },

    /// A selector holds a value that is not one of its options.
    UnknownOption,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required field"),
            Self::InvalidCharacter {
                position,
                character,
            } => write!(
                f,
                "invalid character '{}' at position {} (only digits allowed)",
                character.escape_default(),
                position
            ),
            Self::WrongLength { length, expected } => {
                write!(f, "must be {} digits, got {}", expected, length)
            }
            Self::UnknownOption => write!(f, "not one of the available options"),
        }
    }
}

impl std::error::Error for RecordError {}

/// Errors returned by edits that the controller refuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The selection is not one of the selector's options.
    UnknownOption {
        /// The selector that was edited.
        part: ExpirationPart,
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOption { part, value } => {
                write!(f, "'{}' is not a valid {} option", value, part)
            }
        }
    }
}

impl std::error::Error for FormError {}

/// Failure reported by a [`SubmissionSink`](crate::sink::SubmissionSink).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "reason", rename_all = "snake_case"))]
pub enum SinkError {
    /// The sink answered but did not accept the record.
    Declined,
    /// The sink could not be reached or failed while storing.
    Unavailable(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declined => write!(f, "submission was declined"),
            Self::Unavailable(reason) => write!(f, "submission failed: {}", reason),
        }
    }
}

impl std::error::Error for SinkError {}

/// Why a submit attempt did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The record failed submit-time validation; the sink was not contacted.
    Invalid(RecordReport),
    /// A submission is already in flight.
    InProgress,
    /// `finish_submit` was called without a pending submission.
    NotSubmitting,
    /// The sink rejected the record; the record was kept.
    Rejected(SinkError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(report) => match report.first() {
                Some(failure) => write!(f, "{} {}", failure.field, failure.error),
                None => write!(f, "record is invalid"),
            },
            Self::InProgress => write!(f, "a submission is already in progress"),
            Self::NotSubmitting => write!(f, "no submission is pending"),
            Self::Rejected(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }
}
