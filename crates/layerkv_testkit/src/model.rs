//! Reference model of nested transactions.
//!
//! The model keeps a full copy of the mapping for every open scope. It is
//! slow and memory-hungry but obviously correct, which makes it a good oracle
//! for the undo-log implementation.

use std::collections::BTreeMap;

/// Snapshot-per-scope model of a nested transactional store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceModel {
    current: BTreeMap<String, String>,
    /// Mapping as it was when each open scope began, outermost first.
    saved: Vec<BTreeMap<String, String>>,
}

impl ReferenceModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.current.get(key).map(String::as_str)
    }

    /// Sets `key` to `value`.
    pub fn set(&mut self, key: &str, value: &str) {
        self.current.insert(key.to_string(), value.to_string());
    }

    /// Removes `key`.
    pub fn delete(&mut self, key: &str) {
        self.current.remove(key);
    }

    /// Opens a scope.
    pub fn begin(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Closes the innermost scope keeping the current mapping.
    pub fn commit(&mut self) {
        self.saved.pop();
    }

    /// Closes the innermost scope restoring the mapping it started with.
    pub fn rollback(&mut self) {
        if let Some(saved) = self.saved.pop() {
            self.current = saved;
        }
    }

    /// Returns the number of open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Returns the current mapping.
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.current
    }
}
