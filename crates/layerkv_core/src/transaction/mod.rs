//! Nested transactions over an undo log.
//!
//! LayerKV applies every write to the store immediately and remembers how to
//! reverse it:
//! - **Undo log**: one record per mutation, capturing the key's prior state
//! - **Scope stack**: the path of open transactions, innermost last
//! - **Commit**: drop the innermost scope's records, keep its writes
//! - **Rollback**: replay the innermost scope's records newest-first
//!
//! Because scopes close innermost-first, the records of the active scope are
//! always a contiguous suffix of the log.

mod log;
mod manager;
mod scope;

pub use log::{UndoLog, UndoRecord};
pub use manager::TransactionManager;
