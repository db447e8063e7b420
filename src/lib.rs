//! # card_form
//!
//! Payment card form core for Rust: the field checks, error flags and
//! submission flow behind a card entry form. Rendering is left to the caller.
//!
//! ## Features
//!
//! - Per-keystroke format checks for card number and CVC
//! - Submit-time record validation, one problem at a time or all at once
//! - Form state controller with a pluggable, asynchronous submission sink
//! - In-memory transaction log with simulated network latency
//! - Multiple interfaces: library, CLI, REST API, WASM
//!
//! ## Quick Start
//!
//! ```rust
//! use card_form::{validate_field, validate_record, FieldKey, Record, TextField};
//!
//! // Live check while typing
//! assert!(validate_field(TextField::CardNumber, "4444-5555"));
//! assert!(!validate_field(TextField::CardNumber, "44445555"));
//!
//! // Submit-time check stops at the first failing field
//! let mut record = Record::new();
//! record.card_number = "1234".into();
//! let report = validate_record(&record);
//! assert_eq!(report.flagged_keys(), vec![FieldKey::CardNumber]);
//! ```
//!
//! ## Form Controller
//!
//! ```rust
//! use std::time::Duration;
//! use card_form::{FormController, FormPhase, TextField, TransactionStore};
//!
//! let store = TransactionStore::with_latency(Duration::ZERO);
//! let mut form = FormController::new(store);
//!
//! form.on_field_edit(TextField::Cvc, "12a");
//! assert!(form.errors().cvc.error);
//! assert_eq!(form.phase(), FormPhase::Editing);
//!
//! // Rendering data for the presentation layer
//! let view = form.text_view(TextField::Cvc);
//! assert_eq!(view.label, "CVC");
//! assert!(view.error_message.is_some());
//! ```
//!
//! ## Fields
//!
//! | Field | Id | Rule while typing | Rule on submit |
//! |-------|----|-------------------|----------------|
//! | Card number | `card_number` | digits only | exactly 16 digits |
//! | CVC | `cvc` | digits only | exactly 3 digits |
//! | Card holder name | `card_holder_name` | typing clears the flag | non-empty, max 24 |
//! | Expiration month | `month` | selecting clears the flag | selected |
//! | Expiration year | `year` | selecting clears the flag | selected (2020-2030) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialize records, reports and flags |
//! | `json` | `serde` plus `serde_json` |
//! | `generate` | Random sample records |
//! | `cli` | Command-line tool |
//! | `server` | REST API with Swagger UI |
//! | `wasm` | WebAssembly support |
//!
//! ## Security
//!
//! - Record memory is zeroized on drop and on reset
//! - `Debug` output masks card number and CVC
//! - Logs only ever carry masked card numbers
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod form;
pub mod generate;
pub mod mask;
pub mod record;
pub mod sink;
pub mod state;
pub mod store;
pub mod validate;

#[cfg(feature = "wasm")]
mod wasm;

// Re-export main types at crate root
pub use catalog::{ExpirationPart, FieldKey, TextField};
pub use error::{FormError, RecordError, SinkError, SubmitError};
pub use form::{FormController, FormOptions, FormPhase};
pub use record::{Expiration, FieldEdit, Record};
pub use sink::{Receipt, SubmissionSink};
pub use state::ErrorState;
pub use store::TransactionStore;
pub use validate::{
    field_flag, is_valid_record, validate_field, validate_record, validate_record_all,
    RecordReport, ValidationMode,
};
