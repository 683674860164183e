//! Core type definitions for LayerKV.

use std::fmt;
use uuid::Uuid;

/// Unique identifier for one nesting level.
///
/// Transaction IDs are random and opaque. An ID is never reused once its
/// transaction has been committed or rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generates a fresh transaction ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

/// The kind of mutation an undo record reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// The key was written.
    Set,
    /// The key was removed.
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => f.write_str("SET"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_ids_are_unique() {
        let t1 = TransactionId::generate();
        let t2 = TransactionId::generate();
        assert_ne!(t1, t2);
    }

    #[test]
    fn transaction_id_display() {
        let t = TransactionId::generate();
        let shown = format!("{t}");
        assert!(shown.starts_with("txn:"));
        assert_eq!(shown.len(), "txn:".len() + 36);
    }

    #[test]
    fn operation_kind_display() {
        assert_eq!(OperationKind::Set.to_string(), "SET");
        assert_eq!(OperationKind::Delete.to_string(), "DELETE");
    }
}
