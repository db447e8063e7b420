//! Fuzz target for the form controller.
//!
//! Replays arbitrary edit sequences and checks the controller invariants.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use card_form::{ExpirationPart, FormController, TextField};

#[derive(Arbitrary, Debug)]
enum Action {
    Text(u8, String),
    Selector(bool, String),
    BeginSubmit,
    Accept,
    Reject,
    Reset,
}

fuzz_target!(|actions: Vec<Action>| {
    let mut form = FormController::new(());

    for action in actions {
        match action {
            Action::Text(field, value) => {
                let field = TextField::ALL[field as usize % TextField::ALL.len()];
                form.on_field_edit(field, value);
                assert!(form.record().text(field).chars().count() <= field.max_length());
            }
            Action::Selector(month, value) => {
                let part = if month {
                    ExpirationPart::Month
                } else {
                    ExpirationPart::Year
                };
                let before = form.record().clone();
                if form.on_expiration_edit(part, value).is_err() {
                    assert_eq!(form.record(), &before);
                }
            }
            Action::BeginSubmit => {
                let was_submitting = form.is_submitting();
                let _ = form.begin_submit();
                assert!(!was_submitting || form.is_submitting());
            }
            Action::Accept => {
                if form.finish_submit(Ok(card_form::Receipt { sequence: 0 })).is_ok() {
                    assert!(form.record().is_empty());
                    assert!(!form.errors().any());
                }
            }
            Action::Reject => {
                let _ = form.finish_submit(Err(card_form::SinkError::Declined));
                assert!(!form.is_submitting());
            }
            Action::Reset => form.reset(),
        }
    }

    let _ = form.view();
});
