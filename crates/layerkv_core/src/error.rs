//! Error types for LayerKV core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in LayerKV core operations.
///
/// The engine is in-memory and unbounded, so the engine itself only reports
/// closing a scope when none is open, and only under
/// [`ClosePolicy::Strict`](crate::ClosePolicy::Strict).
/// [`CoreError::TransactionAborted`] is for callers of
/// [`Database::transaction`](crate::Database::transaction) that want to
/// abandon a scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// `commit` or `rollback` was called with no open transaction.
    #[error("no active transaction to {operation}")]
    NoActiveTransaction {
        /// The operation that was attempted (`"commit"` or `"rollback"`).
        operation: &'static str,
    },

    /// The caller abandoned a transaction.
    #[error("transaction aborted: {reason}")]
    TransactionAborted {
        /// Reason for abort.
        reason: String,
    },
}

impl CoreError {
    /// Creates a no-active-transaction error.
    pub fn no_active_transaction(operation: &'static str) -> Self {
        Self::NoActiveTransaction { operation }
    }

    /// Creates a transaction aborted error.
    pub fn transaction_aborted(reason: impl Into<String>) -> Self {
        Self::TransactionAborted {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_operation() {
        let err = CoreError::no_active_transaction("rollback");
        assert_eq!(err.to_string(), "no active transaction to rollback");
    }

    #[test]
    fn display_names_abort_reason() {
        let err = CoreError::transaction_aborted("balance too low");
        assert_eq!(err.to_string(), "transaction aborted: balance too low");
    }
}
