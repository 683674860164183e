//! Key-value store trait definition.

use std::collections::BTreeMap;
use std::fmt::Debug;

/// A raw, transaction-unaware key-value mapping.
///
/// Stores only hold the *current* mapping. They do not record history and
/// cannot undo anything on their own; the transaction manager captures prior
/// state before every call to [`raw_set`](Self::raw_set) or
/// [`raw_delete`](Self::raw_delete).
///
/// # Invariants
///
/// - `get` after `raw_set(k, v)` returns `Some(v)`, including when `v` is empty
/// - `get` after `raw_delete(k)` returns `None`
/// - No operation fails; the mapping is unbounded
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - `HashMap`-backed mapping
pub trait KeyValueStore: Send + Debug {
    /// Looks up the current value of `key`.
    ///
    /// Returns `None` if the key is absent.
    fn get(&self, key: &str) -> Option<&str>;

    /// Inserts or overwrites `key` with `value`.
    fn raw_set(&mut self, key: String, value: String);

    /// Removes `key`. No-op if the key is absent.
    fn raw_delete(&mut self, key: &str);

    /// Returns the number of keys present.
    fn len(&self) -> usize;

    /// Returns a sorted copy of the whole mapping.
    ///
    /// Intended for tests and diagnostics, not for hot paths.
    fn snapshot(&self) -> BTreeMap<String, String>;

    /// Returns `true` if no keys are present.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is present (possibly with an empty value).
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
