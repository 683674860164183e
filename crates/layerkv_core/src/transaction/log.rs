//! Undo records and the append-only undo log.

use crate::types::{OperationKind, TransactionId};
use layerkv_storage::KeyValueStore;

/// Enough prior state to reverse one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    key: String,
    /// Value before the mutation; `None` if the key was absent.
    prior: Option<String>,
    txid: TransactionId,
    kind: OperationKind,
}

impl UndoRecord {
    /// Creates a new undo record.
    #[must_use]
    pub fn new(
        key: String,
        prior: Option<String>,
        txid: TransactionId,
        kind: OperationKind,
    ) -> Self {
        Self {
            key,
            prior,
            txid,
            kind,
        }
    }

    /// Returns the mutated key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value the key held before the mutation, if it was present.
    #[must_use]
    pub fn prior(&self) -> Option<&str> {
        self.prior.as_deref()
    }

    /// Returns `true` if the key was present before the mutation.
    #[must_use]
    pub fn existed(&self) -> bool {
        self.prior.is_some()
    }

    /// Returns the transaction the mutation belongs to.
    #[must_use]
    pub fn transaction(&self) -> TransactionId {
        self.txid
    }

    /// Returns the kind of mutation recorded.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Reverses the recorded mutation against `store`.
    ///
    /// Must be applied newest-first so that repeated writes to one key land
    /// on the oldest prior state.
    pub fn revert<S: KeyValueStore + ?Sized>(self, store: &mut S) {
        match (self.kind, self.prior) {
            (_, Some(prior)) => store.raw_set(self.key, prior),
            // The write created the key.
            (OperationKind::Set, None) => store.raw_delete(&self.key),
            // Deleting an absent key changed nothing.
            (OperationKind::Delete, None) => {}
        }
    }
}

/// Ordered log of undo records, oldest first.
///
/// Records are only ever appended or truncated from the tail.
#[derive(Debug, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
}

impl UndoLog {
    /// Creates an empty log with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Appends a record.
    pub fn append(&mut self, record: UndoRecord) {
        self.records.push(record);
    }

    /// Removes and returns the trailing run of records belonging to `txid`,
    /// oldest first.
    ///
    /// Returns an empty vector if the last record belongs to another
    /// transaction.
    pub fn take_suffix(&mut self, txid: TransactionId) -> Vec<UndoRecord> {
        let start = self
            .records
            .iter()
            .rposition(|r| r.txid != txid)
            .map_or(0, |i| i + 1);
        self.records.split_off(start)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the log holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counts the records belonging to `txid`.
    #[must_use]
    pub fn count_for(&self, txid: TransactionId) -> usize {
        self.records.iter().filter(|r| r.txid == txid).count()
    }

    /// Iterates over records, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &UndoRecord> {
        self.records.iter()
    }
}
