//! Static field catalog for the card form.
//!
//! Enumerates the recognized fields, their labels, placeholders and length
//! limits, and the finite option sets of the expiration selectors.
//!
//! # Example
//!
//! ```
//! use card_form::catalog::{TextField, ExpirationPart, MONTHS, YEARS};
//!
//! assert_eq!(TextField::CardNumber.max_length(), 16);
//! assert_eq!(TextField::Cvc.label(), "CVC");
//! assert_eq!(ExpirationPart::Month.options(), &MONTHS[..]);
//! assert_eq!(YEARS.first(), Some(&"2020"));
//! ```

use std::fmt;
use std::str::FromStr;

/// Required number of digits in a card number.
pub const CARD_NUMBER_LENGTH: usize = 16;

/// Required number of digits in a CVC.
pub const CVC_LENGTH: usize = 3;

/// Maximum number of characters in the card holder name.
pub const CARD_HOLDER_NAME_MAX_LENGTH: usize = 24;

/// Month names offered by the month selector.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Years offered by the year selector.
pub const YEARS: [&str; 11] = [
    "2020", "2021", "2022", "2023", "2024", "2025", "2026", "2027", "2028", "2029", "2030",
];

/// Label of the expiration date selector pair.
pub const EXPIRATION_LABEL: &str = "EXPIRATION DATE";

/// Label of the submit button.
pub const PAY_LABEL: &str = "PAY";

/// Card networks shown as accepted above the form.
pub const ACCEPTED_BRANDS: [&str; 6] = [
    "Visa",
    "Mastercard",
    "Discover",
    "Diners Club",
    "JCB",
    "American Express",
];

/// Free-text input fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextField {
    /// Card number, 16 digits.
    CardNumber,
    /// Card verification code, 3 digits.
    Cvc,
    /// Name printed on the card.
    CardHolderName,
}

impl TextField {
    /// All text fields in display order.
    pub const ALL: [TextField; 3] = [Self::CardNumber, Self::Cvc, Self::CardHolderName];

    /// Returns the field identifier used by the presentation layer.
    #[inline]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::CardNumber => "card_number",
            Self::Cvc => "cvc",
            Self::CardHolderName => "card_holder_name",
        }
    }

    /// Returns the field label.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CardNumber => "CARD NUMBER",
            Self::Cvc => "CVC",
            Self::CardHolderName => "CARD HOLDER NAME",
        }
    }

    /// Returns the placeholder shown while the field is empty.
    #[inline]
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::CardNumber => "4444555566667777",
            Self::Cvc => "123",
            Self::CardHolderName => "John Doe",
        }
    }

    /// Returns the maximum number of characters accepted.
    #[inline]
    pub const fn max_length(&self) -> usize {
        match self {
            Self::CardNumber => CARD_NUMBER_LENGTH,
            Self::Cvc => CVC_LENGTH,
            Self::CardHolderName => CARD_HOLDER_NAME_MAX_LENGTH,
        }
    }

    /// Returns the static message shown when the field is flagged.
    #[inline]
    pub const fn error_message(&self) -> &'static str {
        match self {
            Self::CardNumber => "Please enter 16 characters, no spaces and only numeric values",
            Self::Cvc => "Please enter 3 characters, no spaces and only numeric values",
            Self::CardHolderName => "Required field",
        }
    }

    /// Returns true if the field only accepts digits.
    #[inline]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::CardNumber | Self::Cvc)
    }

    /// Returns the value as the input should render it.
    ///
    /// Numeric fields are rendered without whitespace.
    pub fn display_value(&self, value: &str) -> String {
        if self.is_numeric() {
            value.chars().filter(|c| !c.is_whitespace()).collect()
        } else {
            value.to_string()
        }
    }

    /// Truncates a value to the field's maximum length, in characters.
    pub fn clamp(&self, value: &str) -> String {
        value.chars().take(self.max_length()).collect()
    }
}

/// One of the two expiration selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExpirationPart {
    /// Expiration month.
    Month,
    /// Expiration year.
    Year,
}

impl ExpirationPart {
    /// Both selectors in display order.
    pub const ALL: [ExpirationPart; 2] = [Self::Month, Self::Year];

    /// Returns the selector identifier.
    #[inline]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Returns the placeholder shown while nothing is selected.
    #[inline]
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::Month => "January",
            Self::Year => "2020",
        }
    }

    /// Returns the options the selector offers.
    #[inline]
    pub const fn options(&self) -> &'static [&'static str] {
        match self {
            Self::Month => &MONTHS,
            Self::Year => &YEARS,
        }
    }

    /// Returns true if `value` is one of the selector's options.
    pub fn is_option(&self, value: &str) -> bool {
        self.options().contains(&value)
    }
}

/// A leaf field of the record, as flagged by the error state.
///
/// [`FieldKey::ALL`] lists the keys in the order the submit-time checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKey {
    /// `card_number`
    CardNumber,
    /// `cvc`
    Cvc,
    /// `card_holder_name`
    CardHolderName,
    /// `expiration.month`
    ExpirationMonth,
    /// `expiration.year`
    ExpirationYear,
}

impl FieldKey {
    /// All leaf fields in submit-check priority order.
    pub const ALL: [FieldKey; 5] = [
        Self::CardNumber,
        Self::Cvc,
        Self::CardHolderName,
        Self::ExpirationMonth,
        Self::ExpirationYear,
    ];

    /// Returns the field identifier.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::CardNumber => TextField::CardNumber.id(),
            Self::Cvc => TextField::Cvc.id(),
            Self::CardHolderName => TextField::CardHolderName.id(),
            Self::ExpirationMonth => ExpirationPart::Month.id(),
            Self::ExpirationYear => ExpirationPart::Year.id(),
        }
    }

    /// Returns the static error message, if the field carries one.
    ///
    /// Expiration selectors are flagged without a message.
    pub const fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::CardNumber => Some(TextField::CardNumber.error_message()),
            Self::Cvc => Some(TextField::Cvc.error_message()),
            Self::CardHolderName => Some(TextField::CardHolderName.error_message()),
            Self::ExpirationMonth | Self::ExpirationYear => None,
        }
    }
}

impl From<TextField> for FieldKey {
    fn from(field: TextField) -> Self {
        match field {
            TextField::CardNumber => Self::CardNumber,
            TextField::Cvc => Self::Cvc,
            TextField::CardHolderName => Self::CardHolderName,
        }
    }
}

impl From<ExpirationPart> for FieldKey {
    fn from(part: ExpirationPart) -> Self {
        match part {
            ExpirationPart::Month => Self::ExpirationMonth,
            ExpirationPart::Year => Self::ExpirationYear,
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Display for ExpirationPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown field identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for TextField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextField::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl FromStr for ExpirationPart {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpirationPart::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_lengths() {
        assert_eq!(TextField::CardNumber.max_length(), 16);
        assert_eq!(TextField::Cvc.max_length(), 3);
        assert_eq!(TextField::CardHolderName.max_length(), 24);
    }

    #[test]
    fn test_option_sets() {
        assert_eq!(MONTHS.len(), 12);
        assert_eq!(YEARS.len(), 11);
        assert_eq!(YEARS[0], "2020");
        assert_eq!(YEARS[10], "2030");
        assert!(ExpirationPart::Month.is_option("November"));
        assert!(!ExpirationPart::Month.is_option("Novermber"));
        assert!(ExpirationPart::Year.is_option("2025"));
        assert!(!ExpirationPart::Year.is_option("2031"));
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!("card_number".parse::<TextField>(), Ok(TextField::CardNumber));
        assert_eq!("year".parse::<ExpirationPart>(), Ok(ExpirationPart::Year));
        assert_eq!("month".parse::<FieldKey>(), Ok(FieldKey::ExpirationMonth));
        assert!("cardNumber".parse::<TextField>().is_err());
        assert_eq!(
            "pin".parse::<FieldKey>().unwrap_err().to_string(),
            "unknown field 'pin'"
        );
    }

    #[test]
    fn test_display_value_strips_whitespace_for_numeric() {
        assert_eq!(TextField::CardNumber.display_value("4444 5555"), "44445555");
        assert_eq!(TextField::CardHolderName.display_value("John Doe"), "John Doe");
    }

    #[test]
    fn test_clamp_counts_characters() {
        assert_eq!(TextField::Cvc.clamp("12345"), "123");
        let name = "é".repeat(30);
        assert_eq!(TextField::CardHolderName.clamp(&name).chars().count(), 24);
    }

    #[test]
    fn test_messages_and_placeholders() {
        assert_eq!(
            TextField::CardNumber.error_message(),
            "Please enter 16 characters, no spaces and only numeric values"
        );
        assert_eq!(
            TextField::Cvc.error_message(),
            "Please enter 3 characters, no spaces and only numeric values"
        );
        assert_eq!(TextField::CardHolderName.placeholder(), "John Doe");
        assert_eq!(ExpirationPart::Month.placeholder(), "January");
    }

    #[test]
    fn test_field_key_messages() {
        assert!(FieldKey::CardNumber.error_message().is_some());
        assert!(FieldKey::ExpirationMonth.error_message().is_none());
        assert_eq!(FieldKey::from(TextField::Cvc), FieldKey::Cvc);
        assert_eq!(FieldKey::from(ExpirationPart::Year), FieldKey::ExpirationYear);
    }
}
