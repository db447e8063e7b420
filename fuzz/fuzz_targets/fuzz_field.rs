//! Fuzz target for the per-keystroke field checks.
//!
//! Tests that field checks and masking never panic on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use card_form::mask::{last_four, mask_card_number, mask_cvc};
use card_form::{field_flag, validate_field, TextField};

fuzz_target!(|data: &str| {
    for field in TextField::ALL {
        let flagged = validate_field(field, data);
        let _ = field_flag(field, data);
        let _ = field.display_value(data);
        let clamped = field.clamp(data);
        assert!(clamped.chars().count() <= field.max_length());

        // Digit-only input is never flagged
        if data.chars().all(|c| c.is_ascii_digit()) {
            assert!(!flagged);
        }
    }

    let _ = mask_card_number(data);
    let _ = mask_cvc(data);
    let _ = last_four(data);
});
