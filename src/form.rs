//! Form state controller.
//!
//! [`FormController`] owns the in-progress [`Record`], its [`ErrorState`] and
//! the submitting flag. Every edit runs the per-field check and updates the
//! record and flags together; submit runs the record check and, when it
//! passes, hands a copy of the record to the injected [`SubmissionSink`].
//!
//! # Lifecycle
//!
//! ```text
//! Idle --edit--> Editing --submit (invalid)--> Editing
//!                        --submit (valid)----> Submitting --accepted--> Idle
//!                                                         --rejected--> Editing
//!                                                         --dropped---> Editing
//! ```
//!
//! A presentation layer that runs its own event loop can split a submit in
//! two: [`begin_submit`](FormController::begin_submit) validates and returns
//! the record to send, [`finish_submit`](FormController::finish_submit)
//! applies the sink's answer. [`submit`](FormController::submit) does both.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use card_form::{ExpirationPart, FormController, TextField, TransactionStore};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let store = TransactionStore::with_latency(Duration::ZERO);
//! let mut form = FormController::new(store.clone());
//!
//! form.on_field_edit(TextField::CardNumber, "abc");
//! assert!(form.errors().card_number.error);
//!
//! form.on_field_edit(TextField::CardNumber, "4444555566667777");
//! form.on_field_edit(TextField::Cvc, "123");
//! form.on_field_edit(TextField::CardHolderName, "John Doe");
//! form.on_expiration_edit(ExpirationPart::Month, "January").unwrap();
//! form.on_expiration_edit(ExpirationPart::Year, "2020").unwrap();
//!
//! let receipt = form.submit().await.unwrap();
//! assert_eq!(receipt.sequence, 0);
//! assert!(form.record().is_empty());
//! assert_eq!(store.len(), 1);
//! # });
//! ```

use std::fmt;

use tracing::{debug, info, warn};

use crate::catalog::{ExpirationPart, FieldKey, TextField, EXPIRATION_LABEL, PAY_LABEL};
use crate::error::{FormError, SinkError, SubmitError};
use crate::record::{FieldEdit, Record};
use crate::sink::{Receipt, SubmissionSink};
use crate::state::ErrorState;
use crate::validate::{field_flag, validate_record_with, ValidationMode};

/// Reason reported when a pending submission is dropped.
pub const CANCELLED: &str = "cancelled";

/// Runtime knobs of a [`FormController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOptions {
    /// How many failures a submit attempt flags at once.
    pub validation_mode: ValidationMode,
    /// Truncate text edits to the field's maximum length.
    pub clamp_to_max_length: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::FirstFailure,
            clamp_to_max_length: true,
        }
    }
}

impl FormOptions {
    /// Options for front ends that receive complete values instead of
    /// keystrokes.
    ///
    /// Nothing is truncated, so an over-long value fails the submit-time
    /// length check instead of being cut down and accepted.
    pub fn whole_values() -> Self {
        Self {
            clamp_to_max_length: false,
            ..Self::default()
        }
    }
}

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FormPhase {
    /// Empty record, nothing flagged.
    Idle,
    /// The user has entered data or a submit attempt flagged a field.
    Editing,
    /// A valid record is with the sink.
    Submitting,
}

/// Rendering data for one text input.
#[derive(Clone, PartialEq, Eq)]
pub struct TextFieldView {
    /// The field.
    pub field: TextField,
    /// Field identifier.
    pub id: &'static str,
    /// Input label.
    pub label: &'static str,
    /// Placeholder shown while empty.
    pub placeholder: &'static str,
    /// Maximum characters the input accepts.
    pub max_length: usize,
    /// Value as the input renders it.
    pub value: String,
    /// Whether the field is flagged.
    pub error: bool,
    /// Message to show next to the input, only while flagged.
    pub error_message: Option<&'static str>,
}

impl fmt::Debug for TextFieldView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFieldView")
            .field("field", &self.field)
            .field("length", &self.value.chars().count())
            .field("error", &self.error)
            .finish()
    }
}

/// Rendering data for one expiration selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorView {
    /// The selector.
    pub part: ExpirationPart,
    /// Selector identifier.
    pub id: &'static str,
    /// Placeholder shown while nothing is selected.
    pub placeholder: &'static str,
    /// Current selection, empty if none.
    pub value: String,
    /// Available options.
    pub options: &'static [&'static str],
    /// Whether the selector is flagged.
    pub error: bool,
}

/// Rendering data for the expiration selector pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationView {
    /// Label shown above both selectors.
    pub label: &'static str,
    /// Month selector.
    pub month: SelectorView,
    /// Year selector.
    pub year: SelectorView,
}

/// Everything a presentation layer needs to draw the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    /// Text inputs in display order.
    pub fields: Vec<TextFieldView>,
    /// Expiration selectors.
    pub expiration: ExpirationView,
    /// Submit button label.
    pub pay_label: &'static str,
    /// Whether the submit button shows its loading state.
    pub submitting: bool,
    /// Submission-level error, distinct from field errors.
    pub submission_error: Option<String>,
}

/// Holds the record and error state of one mounted card form.
pub struct FormController<S> {
    record: Record,
    errors: ErrorState,
    submitting: bool,
    submission_error: Option<SinkError>,
    options: FormOptions,
    sink: S,
}

impl<S> FormController<S> {
    /// Creates a controller with an empty record and default options.
    pub fn new(sink: S) -> Self {
        Self::with_options(sink, FormOptions::default())
    }

    /// Creates a controller with an empty record.
    pub fn with_options(sink: S, options: FormOptions) -> Self {
        Self {
            record: Record::new(),
            errors: ErrorState::new(),
            submitting: false,
            submission_error: None,
            options,
            sink,
        }
    }

    /// Returns the current record.
    #[inline]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Returns the current error state.
    #[inline]
    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    /// Returns true while a submission is in flight.
    #[inline]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Returns the error of the last rejected submission, if any.
    #[inline]
    pub fn submission_error(&self) -> Option<&SinkError> {
        self.submission_error.as_ref()
    }

    /// Returns the controller options.
    #[inline]
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Returns the injected sink.
    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> FormPhase {
        if self.submitting {
            FormPhase::Submitting
        } else if self.record.is_empty() && !self.errors.any() {
            FormPhase::Idle
        } else {
            FormPhase::Editing
        }
    }

    /// Applies a text input edit.
    ///
    /// The value is clamped to the field's maximum length (unless disabled in
    /// [`FormOptions`]), its flag is updated from the per-field check, and
    /// the record takes the new value. Edits are accepted in every phase.
    pub fn on_field_edit(&mut self, field: TextField, value: impl Into<String>) {
        let mut value = value.into();
        if self.options.clamp_to_max_length && value.chars().count() > field.max_length() {
            let clamped = field.clamp(&value);
            zeroize::Zeroize::zeroize(&mut value);
            value = clamped;
        }

        let key = FieldKey::from(field);
        if let Some(flag) = field_flag(field, &value) {
            self.errors.set(key, flag);
        }
        debug!(
            field = %field,
            length = value.chars().count(),
            flagged = self.errors.flag(key),
            "field edited"
        );
        self.record.set_text(field, value);
    }

    /// Applies an expiration selector edit.
    ///
    /// A non-empty selection clears the selector's flag. An empty value
    /// clears the selection. Values that are not options of the selector are
    /// refused and leave the form unchanged.
    pub fn on_expiration_edit(
        &mut self,
        part: ExpirationPart,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let value = value.into();
        if !value.is_empty() && !part.is_option(&value) {
            warn!(part = %part, "rejected unknown selector option");
            return Err(FormError::UnknownOption { part, value });
        }

        if !value.is_empty() {
            self.errors.set(part.into(), false);
        }
        debug!(part = %part, value = %value, "selector edited");
        self.record.expiration.set(part, value);
        Ok(())
    }

    /// Applies any edit.
    pub fn apply(&mut self, edit: FieldEdit) -> Result<(), FormError> {
        match edit {
            FieldEdit::Text(field, value) => {
                self.on_field_edit(field, value);
                Ok(())
            }
            FieldEdit::Expiration(part, value) => self.on_expiration_edit(part, value),
        }
    }

    /// Validates the record and, if it passes, marks the form as submitting.
    ///
    /// Returns a copy of the record to hand to the sink. On validation
    /// failure the failed fields are flagged and the form stays editable.
    /// While a submission is in flight every call fails with
    /// [`SubmitError::InProgress`].
    pub fn begin_submit(&mut self) -> Result<Record, SubmitError> {
        if self.submitting {
            warn!("submit ignored, a submission is already in flight");
            return Err(SubmitError::InProgress);
        }

        let report = validate_record_with(&self.record, self.options.validation_mode);
        if !report.is_valid() {
            self.errors.apply(&report);
            debug!(flagged = ?report.flagged_keys(), "submit blocked by validation");
            return Err(SubmitError::Invalid(report));
        }

        self.submitting = true;
        self.submission_error = None;
        info!(card = %self.record.masked_card_number(), "submitting record");
        Ok(self.record.clone())
    }

    /// Applies the sink's answer to a submission started with
    /// [`begin_submit`](Self::begin_submit).
    ///
    /// On acceptance the record and error state return to empty. On rejection
    /// the record is kept and the error is available from
    /// [`submission_error`](Self::submission_error).
    pub fn finish_submit(
        &mut self,
        result: Result<Receipt, SinkError>,
    ) -> Result<Receipt, SubmitError> {
        if !self.submitting {
            return Err(SubmitError::NotSubmitting);
        }
        self.submitting = false;

        match result {
            Ok(receipt) => {
                self.record.clear();
                self.errors.reset();
                info!(sequence = receipt.sequence, "submission accepted");
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, "submission rejected, record kept");
                self.submission_error = Some(err.clone());
                Err(SubmitError::Rejected(err))
            }
        }
    }

    /// Clears the record, the flags and any submission error.
    ///
    /// Does nothing while a submission is in flight.
    pub fn reset(&mut self) {
        if self.submitting {
            return;
        }
        self.record.clear();
        self.errors.reset();
        self.submission_error = None;
    }

    /// Returns rendering data for a text input.
    pub fn text_view(&self, field: TextField) -> TextFieldView {
        TextFieldView {
            field,
            id: field.id(),
            label: field.label(),
            placeholder: field.placeholder(),
            max_length: field.max_length(),
            value: field.display_value(self.record.text(field)),
            error: self.errors.text(field).error,
            error_message: self.errors.message(field),
        }
    }

    /// Returns rendering data for the expiration selectors.
    pub fn expiration_view(&self) -> ExpirationView {
        let selector = |part: ExpirationPart| SelectorView {
            part,
            id: part.id(),
            placeholder: part.placeholder(),
            value: self.record.expiration.get(part).to_string(),
            options: part.options(),
            error: self.errors.expiration(part),
        };

        ExpirationView {
            label: EXPIRATION_LABEL,
            month: selector(ExpirationPart::Month),
            year: selector(ExpirationPart::Year),
        }
    }

    /// Returns rendering data for the whole form.
    pub fn view(&self) -> FormView {
        FormView {
            fields: TextField::ALL.iter().map(|&f| self.text_view(f)).collect(),
            expiration: self.expiration_view(),
            pay_label: PAY_LABEL,
            submitting: self.submitting,
            submission_error: self.submission_error.as_ref().map(|e| e.to_string()),
        }
    }
}

impl<S: SubmissionSink> FormController<S> {
    /// Validates the record and, if valid, submits it and waits for the sink.
    ///
    /// The sink call has no timeout of its own. If the returned future is
    /// dropped before the sink answers, the form leaves the submitting state,
    /// keeps the record and reports [`SinkError::Unavailable`].
    pub async fn submit(&mut self) -> Result<Receipt, SubmitError> {
        let record = self.begin_submit()?;
        let pending = PendingSubmit {
            submitting: &mut self.submitting,
            submission_error: &mut self.submission_error,
            armed: true,
        };
        let result = self.sink.submit(record).await;
        pending.disarm();
        self.finish_submit(result)
    }
}

/// Leaves the submitting state if a [`FormController::submit`] future is
/// dropped while the sink call is pending.
struct PendingSubmit<'a> {
    submitting: &'a mut bool,
    submission_error: &'a mut Option<SinkError>,
    armed: bool,
}

impl PendingSubmit<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("submission dropped before the sink answered, record kept");
            *self.submitting = false;
            *self.submission_error = Some(SinkError::Unavailable(CANCELLED.to_string()));
        }
    }
}

impl<S> fmt::Debug for FormController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("record", &self.record)
            .field("errors", &self.errors.flagged())
            .field("phase", &self.phase())
            .field("submission_error", &self.submission_error)
            .finish()
    }
}
