//! Transaction manager.

use crate::config::{ClosePolicy, Config};
use crate::error::{CoreError, CoreResult};
use crate::stats::TransactionStats;
use crate::transaction::log::{UndoLog, UndoRecord};
use crate::transaction::scope::ScopeStack;
use crate::types::{OperationKind, TransactionId};
use layerkv_storage::{InMemoryStore, KeyValueStore};
use tracing::{debug, trace, warn};

/// Manages nested transactions over a key-value store.
///
/// The transaction manager provides:
/// - Immediate application of writes (reads always see every open scope)
/// - An undo record captured *before* each mutation is applied
/// - Unlimited nesting of `start_transaction` / `commit` / `rollback`
/// - Implicit single-operation transactions for writes made outside any scope
///
/// ## Ownership
///
/// The manager exclusively owns its store, undo log and scope stack and takes
/// `&mut self` for every mutation. It is not internally synchronized: callers
/// that share one manager across threads must put it behind a single lock,
/// as [`Database`](crate::Database) does.
///
/// # Example
///
/// ```rust
/// use layerkv_core::TransactionManager;
///
/// let mut tm = TransactionManager::new();
/// tm.set("k1", "v1");
/// tm.start_transaction();
/// tm.set("k1", "v2");
/// tm.start_transaction();
/// tm.delete("k1");
/// tm.rollback().unwrap();
/// assert_eq!(tm.get("k1"), Some("v2"));
/// tm.commit().unwrap();
/// assert_eq!(tm.get("k1"), Some("v2"));
/// assert_eq!(tm.log_len(), 0);
/// ```
#[derive(Debug)]
pub struct TransactionManager<S: KeyValueStore = InMemoryStore> {
    /// Current mapping, including writes of open scopes.
    store: S,
    /// Undo records of open scopes, oldest first.
    log: UndoLog,
    /// Open scopes, innermost last.
    scopes: ScopeStack,
    /// Configuration.
    config: Config,
    /// Counters.
    stats: TransactionStats,
    /// Depth that `commit` and `rollback` may not close below.
    floor: usize,
}

impl TransactionManager<InMemoryStore> {
    /// Creates a manager over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a manager over an empty in-memory store with custom configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::with_store(InMemoryStore::new(), config)
    }
}

impl Default for TransactionManager<InMemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KeyValueStore> TransactionManager<S> {
    /// Creates a manager over an existing store.
    ///
    /// The store's current contents become the base state: they are outside
    /// every transaction and can never be rolled back.
    #[must_use]
    pub fn with_store(store: S, config: Config) -> Self {
        Self {
            store,
            log: UndoLog::with_capacity(config.log_capacity),
            scopes: ScopeStack::default(),
            config,
            stats: TransactionStats::default(),
            floor: 0,
        }
    }

    /// Returns the current value of `key`, or `None` if it is absent.
    ///
    /// Writes of open transactions are visible.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.store.get(key)
    }

    /// Sets `key` to `value`.
    ///
    /// Outside any transaction the write is wrapped in its own implicit
    /// transaction and committed at once.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.stats.sets += 1;
        self.mutate(key.into(), Some(value.into()));
    }

    /// Removes `key`. Removing an absent key is recorded but changes nothing.
    ///
    /// Outside any transaction the removal is wrapped in its own implicit
    /// transaction and committed at once.
    pub fn delete(&mut self, key: impl Into<String>) {
        self.stats.deletes += 1;
        self.mutate(key.into(), None);
    }

    /// Opens a new transaction nested inside the active one (if any) and
    /// makes it active.
    pub fn start_transaction(&mut self) -> TransactionId {
        let txid = TransactionId::generate();
        let parent = self.scopes.active();
        self.scopes.push(txid);

        self.stats.transactions_started += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.scopes.depth());

        debug!(
            txid = %txid,
            parent = ?parent.map(|p| p.to_string()),
            depth = self.scopes.depth(),
            "transaction started"
        );
        txid
    }

    /// Commits the active transaction.
    ///
    /// Its writes stay applied and its undo records are discarded, so the
    /// writes now belong to the parent scope (or become permanent at the
    /// outermost level). Parent scopes keep their own records.
    ///
    /// # Errors
    ///
    /// With [`ClosePolicy::Strict`], returns
    /// [`CoreError::NoActiveTransaction`] if nothing is open. With the
    /// default [`ClosePolicy::Lenient`] this never fails.
    pub fn commit(&mut self) -> CoreResult<()> {
        if self.scopes.depth() <= self.floor {
            return self.close_idle("commit");
        }
        match self.close_commit() {
            Some(_) => Ok(()),
            None => self.close_idle("commit"),
        }
    }

    /// Rolls back the active transaction.
    ///
    /// Its undo records are replayed newest-first, restoring every key it
    /// touched to the value (or absence) it had when the transaction started.
    ///
    /// # Errors
    ///
    /// With [`ClosePolicy::Strict`], returns
    /// [`CoreError::NoActiveTransaction`] if nothing is open. With the
    /// default [`ClosePolicy::Lenient`] this never fails.
    pub fn rollback(&mut self) -> CoreResult<()> {
        if self.scopes.depth() <= self.floor {
            return self.close_idle("rollback");
        }
        match self.close_rollback() {
            Some(_) => Ok(()),
            None => self.close_idle("rollback"),
        }
    }

    /// Returns the number of open transactions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Returns `true` if any transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        !self.scopes.is_empty()
    }

    /// Returns the innermost open transaction.
    #[must_use]
    pub fn active_transaction(&self) -> Option<TransactionId> {
        self.scopes.active()
    }

    /// Returns the parent of an open transaction.
    ///
    /// `None` if `txid` is the outermost open transaction or is not open.
    #[must_use]
    pub fn parent_of(&self, txid: TransactionId) -> Option<TransactionId> {
        self.scopes.parent(txid)
    }

    /// Returns the open transactions, outermost first.
    #[must_use]
    pub fn transaction_path(&self) -> &[TransactionId] {
        self.scopes.path()
    }

    /// Returns `true` if `txid` has been started and not yet closed.
    #[must_use]
    pub fn is_open(&self, txid: TransactionId) -> bool {
        self.scopes.contains(txid)
    }

    /// Returns the number of undo records held for open transactions.
    #[must_use]
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Returns the undo log.
    #[must_use]
    pub fn log(&self) -> &UndoLog {
        &self.log
    }

    /// Returns a copy of the counters.
    #[must_use]
    pub fn stats(&self) -> TransactionStats {
        self.stats
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the manager and returns the store.
    ///
    /// Writes of still-open transactions remain applied.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Records the prior state of `key`, then applies the write.
    /// `value` of `None` is a delete.
    fn mutate(&mut self, key: String, value: Option<String>) {
        let (txid, implicit) = match self.scopes.active() {
            Some(txid) => (txid, false),
            None => {
                self.stats.implicit_transactions += 1;
                (self.start_transaction(), true)
            }
        };

        let kind = if value.is_some() {
            OperationKind::Set
        } else {
            OperationKind::Delete
        };
        let prior = self.store.get(&key).map(str::to_owned);
        trace!(txid = %txid, key = %key, %kind, existed = prior.is_some(), "apply");
        self.log.append(UndoRecord::new(key.clone(), prior, txid, kind));

        match value {
            Some(value) => self.store.raw_set(key, value),
            None => self.store.raw_delete(&key),
        }

        if implicit {
            self.close_commit();
        }
    }

    /// Closes the active transaction keeping its writes.
    ///
    /// Returns the closed id, or `None` if nothing was open.
    pub(crate) fn close_commit(&mut self) -> Option<TransactionId> {
        let txid = self.scopes.pop()?;
        let discarded = self.log.take_suffix(txid).len();

        self.stats.transactions_committed += 1;
        debug!(
            txid = %txid,
            records = discarded,
            depth = self.scopes.depth(),
            "transaction committed"
        );
        Some(txid)
    }

    /// Closes the active transaction undoing its writes.
    ///
    /// Returns the closed id, or `None` if nothing was open.
    pub(crate) fn close_rollback(&mut self) -> Option<TransactionId> {
        let txid = self.scopes.pop()?;
        let records = self.log.take_suffix(txid);
        let undone = records.len();

        for record in records.into_iter().rev() {
            trace!(txid = %txid, key = record.key(), kind = %record.kind(), "undo");
            record.revert(&mut self.store);
        }

        self.stats.transactions_rolled_back += 1;
        self.stats.records_undone += undone as u64;
        debug!(
            txid = %txid,
            records = undone,
            depth = self.scopes.depth(),
            "transaction rolled back"
        );
        Some(txid)
    }

    /// Pins the scopes at or below `depth` against `commit` and `rollback`,
    /// which then behave as if nothing were open. Returns the previous floor.
    pub(crate) fn replace_floor(&mut self, depth: usize) -> usize {
        std::mem::replace(&mut self.floor, depth)
    }

    fn close_idle(&self, operation: &'static str) -> CoreResult<()> {
        match self.config.close_policy {
            ClosePolicy::Lenient => Ok(()),
            ClosePolicy::Strict => {
                warn!(operation, "no active transaction");
                Err(CoreError::no_active_transaction(operation))
            }
        }
    }
}
