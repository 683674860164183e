//! In-memory key-value store.

use crate::backend::KeyValueStore;
use std::collections::{BTreeMap, HashMap};

/// A `HashMap`-backed key-value store.
///
/// # Thread Safety
///
/// The store is `Send` but takes `&mut self` for mutation. Callers sharing it
/// across threads must wrap the owner in a lock.
///
/// # Example
///
/// ```rust
/// use layerkv_storage::{InMemoryStore, KeyValueStore};
///
/// let mut store = InMemoryStore::new();
/// store.raw_set("k".into(), String::new());
/// assert_eq!(store.get("k"), Some(""));
/// assert!(store.contains_key("k"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: HashMap<String, String>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with `entries`.
    ///
    /// Useful for testing rollback against an existing mapping.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn raw_set(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    fn raw_delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
