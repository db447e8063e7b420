//! The in-progress card record and the edits that change it.
//!
//! A [`Record`] always carries every field; an empty string means the user
//! has not filled that field yet.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::catalog::{ExpirationPart, FieldKey, TextField};
use crate::mask::{mask_card_number, mask_cvc};

/// Selected expiration month and year.
#[derive(Clone, Default, PartialEq, Eq, Zeroize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expiration {
    /// Month name, one of [`MONTHS`](crate::catalog::MONTHS) or empty.
    pub month: String,
    /// Four-digit year, one of [`YEARS`](crate::catalog::YEARS) or empty.
    pub year: String,
}

impl Expiration {
    /// Returns the value of one selector.
    #[inline]
    pub fn get(&self, part: ExpirationPart) -> &str {
        match part {
            ExpirationPart::Month => &self.month,
            ExpirationPart::Year => &self.year,
        }
    }

    /// Replaces the value of one selector.
    #[inline]
    pub fn set(&mut self, part: ExpirationPart, value: String) {
        let slot = match part {
            ExpirationPart::Month => &mut self.month,
            ExpirationPart::Year => &mut self.year,
        };
        slot.zeroize();
        *slot = value;
    }
}

impl fmt::Debug for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expiration")
            .field("month", &self.month)
            .field("year", &self.year)
            .finish()
    }
}

/// The user's card details.
///
/// # Security
///
/// - Memory is zeroed on drop and on [`Record::clear`]
/// - `Debug` masks the card number and CVC
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    /// Card number, digits only once valid.
    #[cfg_attr(feature = "serde", serde(default))]
    pub card_number: String,
    /// Card verification code.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cvc: String,
    /// Name printed on the card.
    #[cfg_attr(feature = "serde", serde(default))]
    pub card_holder_name: String,
    /// Expiration selectors.
    #[cfg_attr(feature = "serde", serde(default))]
    pub expiration: Expiration,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if every field is empty.
    pub fn is_empty(&self) -> bool {
        FieldKey::ALL.iter().all(|&key| self.value(key).is_empty())
    }

    /// Returns the value of a text field.
    #[inline]
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::CardNumber => &self.card_number,
            TextField::Cvc => &self.cvc,
            TextField::CardHolderName => &self.card_holder_name,
        }
    }

    /// Returns the value of any leaf field.
    #[inline]
    pub fn value(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::CardNumber => &self.card_number,
            FieldKey::Cvc => &self.cvc,
            FieldKey::CardHolderName => &self.card_holder_name,
            FieldKey::ExpirationMonth => &self.expiration.month,
            FieldKey::ExpirationYear => &self.expiration.year,
        }
    }

    /// Replaces the value of a text field, zeroing the previous value.
    pub fn set_text(&mut self, field: TextField, value: String) {
        let slot = match field {
            TextField::CardNumber => &mut self.card_number,
            TextField::Cvc => &mut self.cvc,
            TextField::CardHolderName => &mut self.card_holder_name,
        };
        slot.zeroize();
        *slot = value;
    }

    /// Returns the record to its empty state, zeroing every field.
    pub fn clear(&mut self) {
        self.zeroize();
    }

    /// Returns the card number masked for display.
    pub fn masked_card_number(&self) -> String {
        mask_card_number(&self.card_number)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("card_number", &self.masked_card_number())
            .field("cvc", &mask_cvc(&self.cvc))
            .field("card_holder_name", &self.card_holder_name)
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// A single user edit, typed by the field it targets.
#[derive(Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// New value for a free-text input.
    Text(TextField, String),
    /// New selection for an expiration selector.
    Expiration(ExpirationPart, String),
}

impl FieldEdit {
    /// Returns the leaf field this edit targets.
    pub fn key(&self) -> FieldKey {
        match self {
            Self::Text(field, _) => (*field).into(),
            Self::Expiration(part, _) => (*part).into(),
        }
    }
}

impl fmt::Debug for FieldEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Edit values are never printed, only their length
        match self {
            Self::Text(field, value) => f
                .debug_tuple("Text")
                .field(field)
                .field(&value.chars().count())
                .finish(),
            Self::Expiration(part, value) => {
                f.debug_tuple("Expiration").field(part).field(value).finish()
            }
        }
    }
}
