//! Sample records for demos, load tests and fixtures.
//!
//! Generated records pass every submit-time check but are not real cards.
//!
//! # Example
//!
//! ```
//! use card_form::generate::sample_record;
//! use card_form::is_valid_record;
//!
//! // Deterministic, built from the field placeholders
//! let record = sample_record();
//! assert_eq!(record.card_number, "4444555566667777");
//! assert!(is_valid_record(&record));
//! ```

use crate::catalog::{ExpirationPart, TextField, CARD_NUMBER_LENGTH, CVC_LENGTH};
use crate::record::{Expiration, Record};

#[cfg(feature = "generate")]
use rand::seq::SliceRandom;
#[cfg(feature = "generate")]
use rand::Rng;

#[cfg(feature = "generate")]
const FIRST_NAMES: [&str; 6] = ["John", "Jane", "Alex", "Maria", "Chen", "Amara"];
#[cfg(feature = "generate")]
const LAST_NAMES: [&str; 6] = ["Doe", "Smith", "Garcia", "Novak", "Okafor", "Lindqvist"];

/// Returns a valid record filled with the catalog placeholders.
///
/// This version doesn't require the `generate` feature and always returns
/// the same record.
pub fn sample_record() -> Record {
    Record {
        card_number: TextField::CardNumber.placeholder().to_string(),
        cvc: TextField::Cvc.placeholder().to_string(),
        card_holder_name: TextField::CardHolderName.placeholder().to_string(),
        expiration: Expiration {
            month: ExpirationPart::Month.placeholder().to_string(),
            year: ExpirationPart::Year.placeholder().to_string(),
        },
    }
}

/// Generates a random valid record.
///
/// Requires the `generate` feature.
#[cfg(feature = "generate")]
pub fn generate_record() -> Record {
    generate_record_with_rng(&mut rand::thread_rng())
}

/// Generates a random valid record using a specific RNG.
#[cfg(feature = "generate")]
pub fn generate_record_with_rng<R: Rng>(rng: &mut R) -> Record {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("John");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Doe");

    Record {
        card_number: random_digits(rng, CARD_NUMBER_LENGTH),
        cvc: random_digits(rng, CVC_LENGTH),
        card_holder_name: format!("{} {}", first, last),
        expiration: Expiration {
            month: pick(rng, ExpirationPart::Month),
            year: pick(rng, ExpirationPart::Year),
        },
    }
}

/// Generates multiple random valid records.
#[cfg(feature = "generate")]
pub fn generate_records(count: usize) -> Vec<Record> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| generate_record_with_rng(&mut rng)).collect()
}

#[cfg(feature = "generate")]
fn random_digits<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(feature = "generate")]
fn pick<R: Rng>(rng: &mut R, part: ExpirationPart) -> String {
    part.options()
        .choose(rng)
        .copied()
        .unwrap_or(part.placeholder())
        .to_string()
}
