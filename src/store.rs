//! In-memory transaction log used as the default submission sink.
//!
//! The store simulates a remote payment endpoint: every submission waits for
//! a fixed latency and is then appended to an ordered log. Clones of a
//! [`TransactionStore`] share the same log, so it lives as long as any handle
//! does. Entries can be read but never removed.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use card_form::TransactionStore;
//!
//! let store = TransactionStore::with_latency(Duration::ZERO);
//! let handle = store.clone();
//! assert!(handle.is_empty());
//! assert_eq!(store.latency(), Duration::ZERO);
//! ```

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::SinkError;
use crate::record::Record;
use crate::sink::{Receipt, SubmissionSink};

/// Artificial latency of a submission, simulating a network round trip.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

/// Display-safe view of a stored transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransactionSummary {
    /// Position in the log.
    pub sequence: usize,
    /// Masked card number.
    pub card_number: String,
    /// Card holder name.
    pub card_holder_name: String,
    /// Expiration as "Month Year".
    pub expiration: String,
}

/// Shared, append-only log of accepted records.
#[derive(Clone)]
pub struct TransactionStore {
    transactions: Arc<RwLock<Vec<Record>>>,
    latency: Duration,
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore {
    /// Creates an empty store with [`DEFAULT_LATENCY`].
    pub fn new() -> Self {
        Self::with_latency(DEFAULT_LATENCY)
    }

    /// Creates an empty store that answers after `latency`.
    ///
    /// A zero latency skips the timer entirely.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            transactions: Arc::new(RwLock::new(Vec::new())),
            latency,
        }
    }

    /// Returns the configured latency.
    #[inline]
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Returns the number of stored transactions.
    pub fn len(&self) -> usize {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of every stored record, oldest first.
    ///
    /// # Security Warning
    ///
    /// The copies hold full card data. Use [`summaries`](Self::summaries)
    /// for anything that is displayed or logged.
    pub fn values(&self) -> Vec<Record> {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns masked summaries of every stored record, oldest first.
    pub fn summaries(&self) -> Vec<TransactionSummary> {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .enumerate()
            .map(|(sequence, record)| TransactionSummary {
                sequence,
                card_number: record.masked_card_number(),
                card_holder_name: record.card_holder_name.clone(),
                expiration: format!("{} {}", record.expiration.month, record.expiration.year),
            })
            .collect()
    }

    fn append(&self, record: Record) -> Receipt {
        let mut log = self
            .transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let sequence = log.len();
        info!(
            sequence,
            card = %record.masked_card_number(),
            "transaction stored"
        );
        log.push(record);
        Receipt { sequence }
    }
}

impl SubmissionSink for TransactionStore {
    fn submit(&self, record: Record) -> impl Future<Output = Result<Receipt, SinkError>> + Send {
        let store = self.clone();
        async move {
            if !store.latency.is_zero() {
                debug!(latency_ms = store.latency.as_millis() as u64, "simulating network latency");
                tokio::time::sleep(store.latency).await;
            }
            Ok(store.append(record))
        }
    }
}

impl std::fmt::Debug for TransactionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionStore")
            .field("transactions", &self.len())
            .field("latency", &self.latency)
            .finish()
    }
}
