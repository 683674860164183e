//! Transaction statistics.
//!
//! Counters are plain integers: the manager is single-owner, and
//! [`TransactionManager::stats`](crate::TransactionManager::stats) hands out a
//! copy.

/// Counters describing what a transaction manager has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionStats {
    /// Transactions opened, explicit and implicit.
    pub transactions_started: u64,
    /// Transactions closed by commit.
    pub transactions_committed: u64,
    /// Transactions closed by rollback.
    pub transactions_rolled_back: u64,
    /// Single-operation transactions opened around top-level writes.
    pub implicit_transactions: u64,
    /// `set` calls applied.
    pub sets: u64,
    /// `delete` calls applied.
    pub deletes: u64,
    /// Undo records replayed by rollbacks.
    pub records_undone: u64,
    /// Deepest nesting reached.
    pub max_depth: usize,
}

impl TransactionStats {
    /// Returns the number of transactions still open according to the counters.
    #[must_use]
    pub fn open_transactions(&self) -> u64 {
        self.transactions_started - self.transactions_committed - self.transactions_rolled_back
    }
}
