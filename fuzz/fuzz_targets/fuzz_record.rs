//! Fuzz target for submit-time record validation.
//!
//! Tests that both validation modes agree and never panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use card_form::{validate_record, validate_record_all, Expiration, Record};

#[derive(Arbitrary, Debug)]
struct Input {
    card_number: String,
    cvc: String,
    card_holder_name: String,
    month: String,
    year: String,
}

fuzz_target!(|input: Input| {
    let record = Record {
        card_number: input.card_number,
        cvc: input.cvc,
        card_holder_name: input.card_holder_name,
        expiration: Expiration {
            month: input.month,
            year: input.year,
        },
    };

    let first = validate_record(&record);
    let all = validate_record_all(&record);

    assert!(first.failures().len() <= 1);
    assert_eq!(first.first(), all.first());
    assert_eq!(first.is_valid(), all.is_valid());

    let _ = format!("{:?}", record);
    for failure in all.failures() {
        let _ = failure.error.to_string();
    }
});
