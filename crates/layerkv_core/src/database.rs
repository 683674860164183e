//! Lock-guarded database facade.

use crate::config::Config;
use crate::error::CoreResult;
use crate::stats::TransactionStats;
use crate::transaction::TransactionManager;
use crate::types::TransactionId;
use layerkv_storage::{InMemoryStore, KeyValueStore};
use parking_lot::{Mutex, MutexGuard};
use tracing::warn;

/// The main database handle.
///
/// `Database` wraps one [`TransactionManager`] in a single mutex so it can be
/// shared across threads (for example behind an `Arc`). Each call takes the
/// lock for its own duration only.
///
/// # Scopes and threads
///
/// There is exactly one transaction path per database. Calls to
/// `start_transaction` / `commit` / `rollback` made from different threads
/// all act on that same path. To run a multi-step unit of work without other
/// threads interleaving, use [`Database::transaction`], which holds the lock
/// for the whole closure.
///
/// # Example
///
/// ```rust
/// use layerkv_core::{CoreError, Database};
///
/// let db = Database::open_in_memory();
/// db.set("balance", "10");
///
/// let result: Result<(), CoreError> = db.transaction(|txn| {
///     txn.set("balance", "0");
///     Err(CoreError::transaction_aborted("insufficient funds"))
/// });
///
/// assert!(result.is_err());
/// assert_eq!(db.get("balance").as_deref(), Some("10"));
/// ```
#[derive(Debug)]
pub struct Database<S: KeyValueStore = InMemoryStore> {
    inner: Mutex<TransactionManager<S>>,
}

impl Database<InMemoryStore> {
    /// Opens an empty in-memory database.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self::open_with_config(Config::default())
    }

    /// Opens an empty in-memory database with custom configuration.
    #[must_use]
    pub fn open_with_config(config: Config) -> Self {
        Self::from_manager(TransactionManager::with_config(config))
    }
}

impl<S: KeyValueStore> Database<S> {
    /// Wraps an existing transaction manager.
    pub fn from_manager(manager: TransactionManager<S>) -> Self {
        Self {
            inner: Mutex::new(manager),
        }
    }

    /// Returns the current value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).map(str::to_owned)
    }

    /// Sets `key` to `value`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.lock().set(key, value);
    }

    /// Removes `key`.
    pub fn delete(&self, key: impl Into<String>) {
        self.inner.lock().delete(key);
    }

    /// Opens a nested transaction on the shared path.
    pub fn start_transaction(&self) -> TransactionId {
        self.inner.lock().start_transaction()
    }

    /// Commits the active transaction.
    ///
    /// # Errors
    ///
    /// See [`TransactionManager::commit`].
    pub fn commit(&self) -> CoreResult<()> {
        self.inner.lock().commit()
    }

    /// Rolls back the active transaction.
    ///
    /// # Errors
    ///
    /// See [`TransactionManager::rollback`].
    pub fn rollback(&self) -> CoreResult<()> {
        self.inner.lock().rollback()
    }

    /// Executes a function within a transaction.
    ///
    /// The lock is held for the whole call. If the function returns `Ok`, the
    /// transaction is committed; if it returns `Err`, it is rolled back.
    /// Scopes the function opened and left open are closed the same way, so
    /// the database is back at its starting depth when this returns.
    ///
    /// Inside the function, `commit` and `rollback` only close scopes the
    /// function itself opened. Past those they act as if nothing were open,
    /// so with [`ClosePolicy::Strict`](crate::ClosePolicy::Strict) they
    /// return [`CoreError::NoActiveTransaction`](crate::CoreError::NoActiveTransaction).
    ///
    /// If the function panics, every scope it opened is rolled back before
    /// the lock is released.
    pub fn transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut TransactionManager<S>) -> Result<T, E>,
    {
        let mut scope = ClosureScope::enter(self.inner.lock());
        let result = f(&mut *scope.manager);
        if result.is_ok() {
            scope.commit();
        }
        result
    }

    /// Runs `f` with exclusive access to the manager.
    pub fn with_manager<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut TransactionManager<S>) -> T,
    {
        f(&mut *self.inner.lock())
    }

    /// Returns the number of open transactions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.lock().depth()
    }

    /// Returns a copy of the counters.
    #[must_use]
    pub fn stats(&self) -> TransactionStats {
        self.inner.lock().stats()
    }

    /// Consumes the database and returns the manager.
    pub fn into_inner(self) -> TransactionManager<S> {
        self.inner.into_inner()
    }
}

/// Holds the lock for [`Database::transaction`] and unwinds its scopes.
///
/// Dropping rolls back everything above `base`, which covers both the `Err`
/// return and a panic inside the closure.
struct ClosureScope<'a, S: KeyValueStore> {
    manager: MutexGuard<'a, TransactionManager<S>>,
    base: usize,
    floor: usize,
}

impl<'a, S: KeyValueStore> ClosureScope<'a, S> {
    fn enter(mut manager: MutexGuard<'a, TransactionManager<S>>) -> Self {
        let base = manager.depth();
        manager.start_transaction();
        let floor = manager.replace_floor(base + 1);
        Self {
            manager,
            base,
            floor,
        }
    }

    fn commit(&mut self) {
        while self.manager.depth() > self.base {
            if self.manager.close_commit().is_none() {
                break;
            }
        }
    }
}

impl<S: KeyValueStore> Drop for ClosureScope<'_, S> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            warn!(
                depth = self.manager.depth(),
                base = self.base,
                "transaction closure panicked, rolling back"
            );
        }
        while self.manager.depth() > self.base {
            if self.manager.close_rollback().is_none() {
                break;
            }
        }
        self.manager.replace_floor(self.floor);
    }
}

impl Default for Database<InMemoryStore> {
    fn default() -> Self {
        Self::open_in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn create_db() -> Database {
        Database::open_in_memory()
    }

    #[test]
    fn simple_set_get() {
        let db = create_db();
        db.set("k", "v");

        assert_eq!(db.get("k").as_deref(), Some("v"));
        assert_eq!(db.depth(), 0);
    }

    #[test]
    fn transaction_commits_on_ok() {
        let db = create_db();
        let value = db
            .transaction(|txn| {
                txn.set("a", "1");
                txn.set("b", "2");
                Ok::<_, CoreError>(42)
            })
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(db.get("a").as_deref(), Some("1"));
        assert_eq!(db.get("b").as_deref(), Some("2"));
        assert_eq!(db.with_manager(|m| m.log_len()), 0);
    }

    #[test]
    fn transaction_rolls_back_on_err() {
        let db = create_db();
        db.set("a", "1");

        let result: Result<(), CoreError> = db.transaction(|txn| {
            txn.set("a", "2");
            txn.delete("a");
            Err(CoreError::transaction_aborted("test"))
        });

        assert!(matches!(result, Err(CoreError::TransactionAborted { .. })));
        assert_eq!(db.get("a").as_deref(), Some("1"));
        assert_eq!(db.depth(), 0);
    }

    #[test]
    fn transaction_closes_scopes_left_open() {
        let db = create_db();

        let result: Result<(), CoreError> = db.transaction(|txn| {
            txn.set("a", "1");
            txn.start_transaction();
            txn.set("b", "2");
            txn.start_transaction();
            txn.set("c", "3");
            Err(CoreError::transaction_aborted("bail"))
        });

        assert!(result.is_err());
        assert_eq!(db.depth(), 0);
        assert!(db.with_manager(|m| m.store().is_empty()));

        db.transaction(|txn| {
            txn.start_transaction();
            txn.set("d", "4");
            Ok::<_, CoreError>(())
        })
        .unwrap();
        assert_eq!(db.depth(), 0);
        assert_eq!(db.get("d").as_deref(), Some("4"));
    }

    #[test]
    fn transaction_nests_inside_open_scope() {
        let db = create_db();
        db.start_transaction();
        db.set("outer", "1");

        db.transaction(|txn| {
            txn.set("inner", "2");
            Ok::<_, CoreError>(())
        })
        .unwrap();
        assert_eq!(db.depth(), 1);

        db.rollback().unwrap();
        assert_eq!(db.get("outer"), None);
        assert_eq!(db.get("inner"), None);
    }

    #[test]
    fn transaction_cannot_close_outer_scopes() {
        let db = create_db();
        db.start_transaction();
        db.set("outer", "1");

        let result: Result<(), CoreError> = db.transaction(|txn| {
            txn.set("inner", "2");
            txn.rollback()?;
            txn.rollback()?;
            txn.commit()?;
            Ok(())
        });

        assert!(result.is_ok());
        assert_eq!(db.depth(), 1);
        assert_eq!(db.get("outer").as_deref(), Some("1"));
        assert_eq!(db.get("inner").as_deref(), Some("2"));

        db.rollback().unwrap();
        assert_eq!(db.get("outer"), None);
        assert_eq!(db.get("inner"), None);
        assert_eq!(db.depth(), 0);
    }

    #[test]
    fn transaction_closes_only_its_own_nested_scopes() {
        let db = create_db();

        db.transaction(|txn| {
            txn.set("a", "1");
            txn.start_transaction();
            txn.set("b", "2");
            txn.rollback()?;
            txn.rollback()?;
            Ok::<_, CoreError>(())
        })
        .unwrap();

        assert_eq!(db.depth(), 0);
        assert_eq!(db.get("a").as_deref(), Some("1"));
        assert_eq!(db.get("b"), None);

        // Closes work normally again once the closure has returned.
        db.start_transaction();
        db.set("c", "3");
        db.rollback().unwrap();
        assert_eq!(db.get("c"), None);
    }

    #[test]
    fn strict_transaction_reports_close_past_its_scope() {
        let db = Database::open_with_config(Config::new().strict());
        db.start_transaction();
        db.set("outer", "1");

        let result: Result<(), CoreError> = db.transaction(|txn| {
            txn.set("inner", "2");
            txn.commit()
        });

        assert!(matches!(
            result,
            Err(CoreError::NoActiveTransaction {
                operation: "commit"
            })
        ));
        assert_eq!(db.depth(), 1);
        assert_eq!(db.get("outer").as_deref(), Some("1"));
        assert_eq!(db.get("inner"), None);
    }

    #[test]
    fn transaction_rolls_back_on_panic() {
        let db = create_db();
        db.start_transaction();
        db.set("outer", "1");

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            db.transaction(|txn| {
                txn.set("half", "done");
                txn.start_transaction();
                txn.set("deeper", "x");
                if txn.depth() > 0 {
                    panic!("closure failed");
                }
                Ok::<_, CoreError>(())
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(db.depth(), 1);
        assert_eq!(db.get("half"), None);
        assert_eq!(db.get("deeper"), None);
        assert_eq!(db.get("outer").as_deref(), Some("1"));

        db.commit().unwrap();
        assert_eq!(db.depth(), 0);
        assert_eq!(db.with_manager(|m| m.log_len()), 0);
    }

    #[test]
    fn strict_database_reports_idle_close() {
        let db = Database::open_with_config(Config::new().strict());
        assert!(db.commit().is_err());
        assert!(db.rollback().is_err());
    }

    #[test]
    fn into_inner_returns_manager() {
        let db = create_db();
        db.set("k", "v");
        let manager = db.into_inner();
        assert_eq!(manager.get("k"), Some("v"));
        assert_eq!(manager.stats().sets, 1);
    }
}
