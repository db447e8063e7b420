//! Integration tests for card_form.
//!
//! These tests drive the public API the way a presentation layer would:
//! keystrokes, selector changes, submit clicks and the sink's answers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use card_form::catalog::{MONTHS, YEARS};
use card_form::mask::{last_four, mask_card_number, mask_cvc};
use card_form::{
    validate_field, validate_record, validate_record_all, ErrorState, Expiration, ExpirationPart,
    FieldEdit, FieldKey, FormController, FormError, FormOptions, FormPhase, Receipt, Record,
    RecordError, SinkError, SubmissionSink, SubmitError, TextField, TransactionStore,
    ValidationMode,
};

// =============================================================================
// FIXTURES
// =============================================================================

fn john_doe() -> Record {
    Record {
        card_number: "4444555566667777".into(),
        cvc: "123".into(),
        card_holder_name: "John Doe".into(),
        expiration: Expiration {
            month: "January".into(),
            year: "2020".into(),
        },
    }
}

fn fill<S>(form: &mut FormController<S>, record: &Record) {
    form.on_field_edit(TextField::CardNumber, record.card_number.as_str());
    form.on_field_edit(TextField::Cvc, record.cvc.as_str());
    form.on_field_edit(TextField::CardHolderName, record.card_holder_name.as_str());
    form.on_expiration_edit(ExpirationPart::Month, record.expiration.month.as_str())
        .unwrap();
    form.on_expiration_edit(ExpirationPart::Year, record.expiration.year.as_str())
        .unwrap();
}

fn instant_store() -> TransactionStore {
    TransactionStore::with_latency(Duration::ZERO)
}

/// Sink that always fails and counts how often it was asked.
#[derive(Clone, Default)]
struct DownSink {
    calls: Arc<AtomicUsize>,
}

impl SubmissionSink for DownSink {
    fn submit(
        &self,
        _record: Record,
    ) -> impl std::future::Future<Output = Result<Receipt, SinkError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        async { Err(SinkError::Unavailable("connection reset".into())) }
    }
}

// =============================================================================
// LIVE FIELD CHECKS
// =============================================================================

#[test]
fn test_numeric_fields_flag_non_digits() {
    for field in [TextField::CardNumber, TextField::Cvc] {
        for value in ["abc", "12a", "1 2", "1-2", "١٢٣", "12.5"] {
            assert!(validate_field(field, value), "{} should flag {:?}", field, value);
        }
        for value in ["", "0", "123", "4444555566667777"] {
            assert!(!validate_field(field, value), "{} should accept {:?}", field, value);
        }
    }
}

#[test]
fn test_name_field_is_never_flagged_while_typing() {
    for value in ["", "John", "J0hn D03", "!!!"] {
        assert!(!validate_field(TextField::CardHolderName, value));
    }
}

#[test]
fn test_numeric_field_edits_set_and_clear_flags() {
    let mut form = FormController::new(instant_store());

    form.on_field_edit(TextField::Cvc, "1a");
    assert!(form.errors().cvc.error);
    assert_eq!(form.errors().message(TextField::Cvc), Some(TextField::Cvc.error_message()));

    form.on_field_edit(TextField::Cvc, "12");
    assert!(!form.errors().cvc.error);
    assert_eq!(form.errors().message(TextField::Cvc), None);

    form.on_field_edit(TextField::Cvc, "");
    assert!(!form.errors().cvc.error);
}

#[test]
fn test_name_flag_is_only_cleared_by_typing() {
    let mut form = FormController::new(instant_store());

    // Only a submit attempt can flag the name
    let _ = form.begin_submit();
    form.on_field_edit(TextField::CardNumber, "4444555566667777");
    form.on_field_edit(TextField::Cvc, "123");
    let _ = form.begin_submit();
    assert!(form.errors().card_holder_name.error);

    // Clearing the input keeps the flag
    form.on_field_edit(TextField::CardHolderName, "");
    assert!(form.errors().card_holder_name.error);

    form.on_field_edit(TextField::CardHolderName, "J");
    assert!(!form.errors().card_holder_name.error);
}

#[test]
fn test_edits_are_independent() {
    let mut form = FormController::new(instant_store());

    form.on_field_edit(TextField::CardNumber, "x");
    form.on_field_edit(TextField::Cvc, "123");
    form.on_field_edit(TextField::CardHolderName, "Jane");

    assert!(form.errors().card_number.error);
    assert!(!form.errors().cvc.error);
    assert_eq!(form.record().card_number, "x");
    assert_eq!(form.record().cvc, "123");
    assert_eq!(form.record().card_holder_name, "Jane");
}

#[test]
fn test_edits_are_idempotent() {
    let mut form = FormController::new(instant_store());
    form.on_field_edit(TextField::CardNumber, "12ab");
    let record = form.record().clone();
    let errors = *form.errors();

    form.on_field_edit(TextField::CardNumber, "12ab");
    assert_eq!(form.record(), &record);
    assert_eq!(form.errors(), &errors);
}

#[test]
fn test_edits_are_clamped_to_max_length() {
    let mut form = FormController::new(instant_store());
    form.on_field_edit(TextField::CardNumber, "44445555666677778888");
    form.on_field_edit(TextField::CardHolderName, "A".repeat(40));

    assert_eq!(form.record().card_number, "4444555566667777");
    assert_eq!(form.record().card_holder_name.chars().count(), 24);
}

#[test]
fn test_clamping_can_be_disabled() {
    let options = FormOptions {
        clamp_to_max_length: false,
        ..FormOptions::default()
    };
    let mut form = FormController::with_options(instant_store(), options);
    form.on_field_edit(TextField::Cvc, "12345");
    assert_eq!(form.record().cvc, "12345");
}

// =============================================================================
// SELECTORS
// =============================================================================

#[test]
fn test_selector_options() {
    assert_eq!(ExpirationPart::Month.options().len(), 12);
    assert_eq!(ExpirationPart::Year.options().len(), 11);
    assert!(MONTHS.contains(&"November"));
    assert_eq!(YEARS.first(), Some(&"2020"));
    assert_eq!(YEARS.last(), Some(&"2030"));
}

#[test]
fn test_selector_edit_clears_flag() {
    let mut form = FormController::new(instant_store());
    fill(&mut form, &john_doe());
    form.on_expiration_edit(ExpirationPart::Year, "").unwrap();

    assert!(matches!(form.begin_submit(), Err(SubmitError::Invalid(_))));
    assert!(form.errors().expiration.year);

    form.on_expiration_edit(ExpirationPart::Year, "2025").unwrap();
    assert!(!form.errors().expiration.year);
    assert_eq!(form.record().expiration.year, "2025");
}

#[test]
fn test_unknown_option_is_refused() {
    let mut form = FormController::new(instant_store());
    let err = form
        .on_expiration_edit(ExpirationPart::Month, "Smarch")
        .unwrap_err();

    assert_eq!(
        err,
        FormError::UnknownOption {
            part: ExpirationPart::Month,
            value: "Smarch".into()
        }
    );
    assert!(form.record().expiration.month.is_empty());
}

#[test]
fn test_apply_routes_edits() {
    let mut form = FormController::new(instant_store());
    form.apply(FieldEdit::Text(TextField::Cvc, "999".into()))
        .unwrap();
    form.apply(FieldEdit::Expiration(ExpirationPart::Month, "May".into()))
        .unwrap();

    assert_eq!(form.record().cvc, "999");
    assert_eq!(form.record().expiration.month, "May");
    assert!(form
        .apply(FieldEdit::Expiration(ExpirationPart::Year, "1999".into()))
        .is_err());
}

// =============================================================================
// SUBMIT-TIME VALIDATION
// =============================================================================

#[test]
fn test_valid_record_passes() {
    assert!(validate_record(&john_doe()).is_valid());
    assert!(validate_record_all(&john_doe()).is_valid());
}

#[test]
fn test_priority_order() {
    let cases: [(fn(&mut Record), FieldKey); 5] = [
        (|r| r.card_number.clear(), FieldKey::CardNumber),
        (|r| r.cvc = "12".into(), FieldKey::Cvc),
        (|r| r.card_holder_name.clear(), FieldKey::CardHolderName),
        (|r| r.expiration.month.clear(), FieldKey::ExpirationMonth),
        (|r| r.expiration.year.clear(), FieldKey::ExpirationYear),
    ];

    for (breaks, key) in cases {
        let mut record = john_doe();
        breaks(&mut record);
        assert_eq!(validate_record(&record).flagged_keys(), vec![key]);
    }
}

#[test]
fn test_short_circuit_reports_only_the_first_failure() {
    let report = validate_record(&Record::new());
    assert_eq!(report.flagged_keys(), vec![FieldKey::CardNumber]);
    assert_eq!(report.error(FieldKey::CardNumber), Some(&RecordError::Required));
}

#[test]
fn test_all_failures_mode_reports_everything() {
    let report = validate_record_all(&Record::new());
    assert_eq!(report.flagged_keys(), FieldKey::ALL.to_vec());
}

#[test]
fn test_length_boundaries() {
    let mut record = john_doe();
    for (number, valid) in [
        ("444455556666777", false),
        ("4444555566667777", true),
        ("44445555666677778", false),
    ] {
        record.card_number = number.into();
        assert_eq!(validate_record(&record).is_valid(), valid, "{}", number);
    }

    let mut record = john_doe();
    for (cvc, valid) in [("12", false), ("123", true), ("1234", false)] {
        record.cvc = cvc.into();
        assert_eq!(validate_record(&record).is_valid(), valid, "{}", cvc);
    }
}

#[test]
fn test_submit_rejects_non_digits_of_correct_length() {
    let mut record = john_doe();
    record.card_number = "4444 5555 6666 7".into();
    let report = validate_record(&record);
    assert_eq!(
        report.error(FieldKey::CardNumber),
        Some(&RecordError::InvalidCharacter {
            position: 4,
            character: ' '
        })
    );
}

#[test]
fn test_flags_are_set_but_never_cleared_by_submit() {
    let mut errors = ErrorState::new();
    errors.set(FieldKey::Cvc, true);

    let mut record = john_doe();
    record.card_number = "1".into();
    errors.apply(&validate_record(&record));

    assert!(errors.card_number.error);
    assert!(errors.cvc.error);
}

// =============================================================================
// SUBMISSION LIFECYCLE
// =============================================================================

#[tokio::test]
async fn test_end_to_end_scenario() {
    let store = instant_store();
    let mut form = FormController::new(store.clone());
    assert_eq!(form.phase(), FormPhase::Idle);

    form.on_field_edit(TextField::CardNumber, "abc");
    assert!(form.errors().card_number.error);
    assert_eq!(form.phase(), FormPhase::Editing);

    form.on_field_edit(TextField::CardNumber, "1234");
    assert!(!form.errors().card_number.error);

    // Short card number blocks submit and is the only flagged field
    let err = form.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Invalid(_)));
    assert_eq!(form.errors().flagged(), vec![FieldKey::CardNumber]);
    assert!(store.is_empty());

    fill(&mut form, &john_doe());
    let receipt = form.submit().await.unwrap();

    assert_eq!(receipt.sequence, 0);
    assert_eq!(store.values(), vec![john_doe()]);
    assert!(form.record().is_empty());
    assert!(!form.errors().any());
    assert_eq!(form.phase(), FormPhase::Idle);
}

#[tokio::test]
async fn test_log_keeps_submission_order() {
    let store = instant_store();
    let mut form = FormController::new(store.clone());

    for name in ["Ann", "Bob", "Cy"] {
        let mut record = john_doe();
        record.card_holder_name = name.into();
        fill(&mut form, &record);
        form.submit().await.unwrap();
    }

    let names: Vec<String> = store
        .values()
        .into_iter()
        .map(|r| r.card_holder_name.clone())
        .collect();
    assert_eq!(names, ["Ann", "Bob", "Cy"]);
}

#[tokio::test]
async fn test_log_outlives_the_form() {
    let store = instant_store();
    {
        let mut form = FormController::new(store.clone());
        fill(&mut form, &john_doe());
        form.submit().await.unwrap();
    }
    assert_eq!(store.len(), 1);
}

#[test]
fn test_overlapping_submit_is_refused() {
    let mut form = FormController::new(instant_store());
    fill(&mut form, &john_doe());

    let record = form.begin_submit().unwrap();
    assert_eq!(record, john_doe());
    assert!(form.is_submitting());
    assert_eq!(form.phase(), FormPhase::Submitting);

    assert_eq!(form.begin_submit().unwrap_err(), SubmitError::InProgress);

    form.finish_submit(Ok(Receipt { sequence: 0 })).unwrap();
    assert!(!form.is_submitting());
    assert_eq!(
        form.finish_submit(Ok(Receipt { sequence: 1 })).unwrap_err(),
        SubmitError::NotSubmitting
    );
}

#[test]
fn test_reset_is_ignored_while_submitting() {
    let mut form = FormController::new(instant_store());
    fill(&mut form, &john_doe());
    form.begin_submit().unwrap();

    form.reset();
    assert_eq!(form.record(), &john_doe());
}

#[tokio::test]
async fn test_rejected_submit_keeps_record() {
    let sink = DownSink::default();
    let mut form = FormController::new(sink.clone());
    fill(&mut form, &john_doe());

    let err = form.submit().await.unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected(SinkError::Unavailable("connection reset".into()))
    );
    assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    assert_eq!(form.record(), &john_doe());
    assert!(!form.is_submitting());
    assert!(form.submission_error().is_some());
    assert!(!form.errors().any());

    // Retrying clears the submission error until the sink answers again
    form.begin_submit().unwrap();
    assert!(form.submission_error().is_none());
}

#[tokio::test]
async fn test_invalid_record_never_reaches_sink() {
    let sink = DownSink::default();
    let mut form = FormController::new(sink.clone());

    assert!(matches!(form.submit().await, Err(SubmitError::Invalid(_))));
    assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_default_store_waits_two_seconds() {
    let store = TransactionStore::new();
    let mut form = FormController::new(store.clone());
    fill(&mut form, &john_doe());

    let start = tokio::time::Instant::now();
    form.submit().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_all_failures_mode_flags_every_field() {
    let options = FormOptions {
        validation_mode: ValidationMode::AllFailures,
        ..FormOptions::default()
    };
    let mut form = FormController::with_options(instant_store(), options);

    let _ = form.submit().await;
    assert_eq!(form.errors().flagged(), FieldKey::ALL.to_vec());
}

// =============================================================================
// VIEWS
// =============================================================================

#[test]
fn test_view_reflects_state() {
    let mut form = FormController::new(instant_store());
    form.on_field_edit(TextField::CardNumber, "4444 5555");

    let view = form.view();
    assert_eq!(view.fields.len(), 3);
    assert_eq!(view.fields[0].label, "CARD NUMBER");
    assert_eq!(view.fields[0].value, "44445555");
    assert_eq!(view.expiration.label, "EXPIRATION DATE");
    assert_eq!(view.expiration.month.options.len(), 12);
    assert_eq!(view.pay_label, "PAY");
    assert!(!view.submitting);
    assert!(view.submission_error.is_none());
}

// =============================================================================
// SECURITY
// =============================================================================

#[test]
fn test_debug_never_exposes_card_data() {
    let record = john_doe();
    let debug = format!("{:?}", record);
    assert!(!debug.contains("4444555566667777"));
    assert!(!debug.contains("123"));

    let mut form = FormController::new(instant_store());
    fill(&mut form, &record);
    let debug = format!("{:?}", form);
    assert!(!debug.contains("4444555566667777"));

    let edit = FieldEdit::Text(TextField::CardNumber, "4444555566667777".into());
    assert!(!format!("{:?}", edit).contains("4444555566667777"));
}

#[tokio::test]
async fn test_summaries_are_masked() {
    let store = instant_store();
    let mut form = FormController::new(store.clone());
    fill(&mut form, &john_doe());
    form.submit().await.unwrap();

    let summary = &store.summaries()[0];
    assert_eq!(summary.card_number, "****-****-****-7777");
    assert_eq!(summary.expiration, "January 2020");
}

#[test]
fn test_masking_helpers() {
    assert_eq!(mask_card_number("4444555566667777"), "****-****-****-7777");
    assert_eq!(mask_card_number("1234"), "****");
    assert_eq!(mask_cvc("123"), "***");
    assert_eq!(last_four("4444555566667777"), "7777");
    assert_eq!(last_four("12"), "");
}
