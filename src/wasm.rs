//! WebAssembly bindings for the card form.
//!
//! The browser owns rendering and the network call; this module owns the
//! record, the error flags and the submit state.
//!
//! # Usage from JavaScript
//!
//! ```javascript
//! import init, { CardForm } from 'card_form';
//!
//! await init();
//!
//! const form = new CardForm();
//! form.edit("card_number", "4444555566667777");
//! console.log(form.error("card_number"));  // false
//!
//! try {
//!     const record = form.begin_submit();
//!     const response = await fetch("/transactions", { method: "POST", body: JSON.stringify(record) });
//!     if (response.ok) {
//!         form.accept((await response.json()).sequence);
//!     } else {
//!         form.reject(await response.text());
//!     }
//! } catch (e) {
//!     // invalid record: flags are set, re-render
//! }
//! ```

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::catalog::{ExpirationPart, FieldKey, TextField};
use crate::error::SinkError;
use crate::form::{FormController, FormPhase};
use crate::sink::Receipt;

fn parse_key(field: &str) -> Result<FieldKey, JsValue> {
    field
        .parse::<FieldKey>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_text(field: &str) -> Result<TextField, JsValue> {
    field
        .parse::<TextField>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn set(object: &js_sys::Object, key: &str, value: &str) -> Result<(), JsValue> {
    js_sys::Reflect::set(object, &JsValue::from_str(key), &JsValue::from_str(value))?;
    Ok(())
}

fn to_array(items: &[&str]) -> js_sys::Array {
    items.iter().map(|s| JsValue::from_str(s)).collect()
}

/// Returns the error flag for a text field value while typing.
///
/// # Example
/// ```javascript
/// validate_field("cvc", "12a")  // true
/// ```
#[wasm_bindgen]
pub fn validate_field(field: &str, value: &str) -> Result<bool, JsValue> {
    Ok(crate::validate::validate_field(parse_text(field)?, value))
}

/// Returns the month selector options.
#[wasm_bindgen]
pub fn month_options() -> js_sys::Array {
    to_array(ExpirationPart::Month.options())
}

/// Returns the year selector options.
#[wasm_bindgen]
pub fn year_options() -> js_sys::Array {
    to_array(ExpirationPart::Year.options())
}

/// A mounted card form.
#[wasm_bindgen(js_name = CardForm)]
pub struct WasmCardForm {
    inner: FormController<()>,
}

#[wasm_bindgen(js_class = CardForm)]
impl WasmCardForm {
    /// Creates a form with an empty record.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: FormController::new(()),
        }
    }

    /// Applies an edit to any field (`card_number`, `cvc`,
    /// `card_holder_name`, `month`, `year`).
    pub fn edit(&mut self, field: &str, value: String) -> Result<(), JsValue> {
        match parse_key(field)? {
            FieldKey::CardNumber => self.inner.on_field_edit(TextField::CardNumber, value),
            FieldKey::Cvc => self.inner.on_field_edit(TextField::Cvc, value),
            FieldKey::CardHolderName => {
                self.inner.on_field_edit(TextField::CardHolderName, value)
            }
            FieldKey::ExpirationMonth => self
                .inner
                .on_expiration_edit(ExpirationPart::Month, value)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            FieldKey::ExpirationYear => self
                .inner
                .on_expiration_edit(ExpirationPart::Year, value)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
        }
        Ok(())
    }

    /// Returns the value a field should render.
    pub fn value(&self, field: &str) -> Result<String, JsValue> {
        let key = parse_key(field)?;
        Ok(match field.parse::<TextField>() {
            Ok(text) => text.display_value(self.inner.record().text(text)),
            Err(_) => self.inner.record().value(key).to_string(),
        })
    }

    /// Returns the error flag of a field.
    pub fn error(&self, field: &str) -> Result<bool, JsValue> {
        Ok(self.inner.errors().flag(parse_key(field)?))
    }

    /// Returns the message to show for a flagged text field.
    pub fn error_message(&self, field: &str) -> Result<Option<String>, JsValue> {
        Ok(self
            .inner
            .errors()
            .message(parse_text(field)?)
            .map(str::to_string))
    }

    /// Whether the submit button should show its loading state.
    #[wasm_bindgen(getter)]
    pub fn submitting(&self) -> bool {
        self.inner.is_submitting()
    }

    /// Current phase: `idle`, `editing` or `submitting`.
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        match self.inner.phase() {
            FormPhase::Idle => "idle",
            FormPhase::Editing => "editing",
            FormPhase::Submitting => "submitting",
        }
        .to_string()
    }

    /// Error of the last rejected submission.
    #[wasm_bindgen(getter)]
    pub fn submission_error(&self) -> Option<String> {
        self.inner.submission_error().map(|e| e.to_string())
    }

    /// Validates the record and returns it as a plain object to send.
    ///
    /// Throws when the record is invalid (flags are updated) or a submission
    /// is already in flight.
    pub fn begin_submit(&mut self) -> Result<js_sys::Object, JsValue> {
        let record = self
            .inner
            .begin_submit()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let object = js_sys::Object::new();
        set(&object, "card_number", &record.card_number)?;
        set(&object, "cvc", &record.cvc)?;
        set(&object, "card_holder_name", &record.card_holder_name)?;
        let expiration = js_sys::Object::new();
        set(&expiration, "month", &record.expiration.month)?;
        set(&expiration, "year", &record.expiration.year)?;
        js_sys::Reflect::set(&object, &JsValue::from_str("expiration"), &expiration)?;
        Ok(object)
    }

    /// Reports that the pending submission was accepted.
    pub fn accept(&mut self, sequence: u32) -> Result<(), JsValue> {
        self.inner
            .finish_submit(Ok(Receipt {
                sequence: sequence as usize,
            }))
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Reports that the pending submission failed. The record is kept.
    pub fn reject(&mut self, reason: Option<String>) -> Result<(), JsValue> {
        let err = match reason {
            Some(reason) => SinkError::Unavailable(reason),
            None => SinkError::Declined,
        };
        match self.inner.finish_submit(Err(err)) {
            Err(crate::error::SubmitError::Rejected(_)) => Ok(()),
            Err(e) => Err(JsValue::from_str(&e.to_string())),
            Ok(_) => Ok(()),
        }
    }
}

impl Default for WasmCardForm {
    fn default() -> Self {
        Self::new()
    }
}
