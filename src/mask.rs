//! Masking helpers for card data that ends up in logs or responses.
//!
//! PCI-DSS allows showing the last 4 digits of a card number. The CVC is
//! never shown.
//!
//! # Example
//!
//! ```
//! use card_form::mask::{mask_card_number, mask_cvc};
//!
//! assert_eq!(mask_card_number("4444555566667777"), "****-****-****-7777");
//! assert_eq!(mask_cvc("123"), "***");
//! ```

/// Masks a card number showing only the last 4 digits.
///
/// Non-digit characters are ignored. Inputs with 4 digits or fewer are fully
/// masked, so a partially typed number never leaks.
#[inline]
pub fn mask_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let len = digits.len();

    if len <= 4 {
        return "*".repeat(len);
    }

    let masked_count = len - 4;
    let mut result = String::with_capacity(len + (len / 4));

    for i in 0..masked_count {
        if i > 0 && i % 4 == 0 {
            result.push('-');
        }
        result.push('*');
    }

    if masked_count % 4 == 0 {
        result.push('-');
    }

    result.extend(&digits[len - 4..]);
    result
}

/// Masks a CVC entirely, keeping its length visible.
#[inline]
pub fn mask_cvc(input: &str) -> String {
    "*".repeat(input.chars().count())
}

/// Returns the last 4 digits of a card number, or an empty string if the
/// number has fewer than 4 digits.
#[inline]
pub fn last_four(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 4 {
        digits[digits.len() - 4..].iter().collect()
    } else {
        String::new()
    }
}
