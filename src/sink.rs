//! The contract between the form controller and whatever accepts records.
//!
//! A sink is handed to [`FormController::new`](crate::FormController::new),
//! so tests can swap the in-memory [`TransactionStore`](crate::TransactionStore)
//! for a fake.

use std::future::Future;

use crate::error::SinkError;
use crate::record::Record;

/// Acknowledgement of an accepted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Receipt {
    /// Position of the record in the sink's log, starting at 0.
    pub sequence: usize,
}

/// Accepts validated records asynchronously.
///
/// A sink that answers with a plain "no" should return
/// [`SinkError::Declined`]; transport or storage failures map to
/// [`SinkError::Unavailable`].
pub trait SubmissionSink {
    /// Hands a validated record to the sink.
    fn submit(&self, record: Record) -> impl Future<Output = Result<Receipt, SinkError>> + Send;
}
