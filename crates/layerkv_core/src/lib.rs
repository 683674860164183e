//! # LayerKV Core
//!
//! Nested transaction engine for LayerKV.
//!
//! This crate provides:
//! - An undo log that records the prior state of every mutation
//! - Unlimited begin/commit/rollback nesting over a flat string mapping
//! - Implicit single-operation transactions for top-level writes
//! - A lock-guarded [`Database`] facade for sharing across threads
//!
//! ## Example
//!
//! ```rust
//! use layerkv_core::TransactionManager;
//!
//! let mut tm = TransactionManager::new();
//! tm.set("k1", "v1");
//!
//! tm.start_transaction();
//! tm.set("k1", "v2");
//! tm.rollback().unwrap();
//!
//! assert_eq!(tm.get("k1"), Some("v1"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod stats;
mod transaction;
mod types;

pub use config::{ClosePolicy, Config};
pub use database::Database;
pub use error::{CoreError, CoreResult};
pub use stats::TransactionStats;
pub use transaction::{TransactionManager, UndoLog, UndoRecord};
pub use types::{OperationKind, TransactionId};

pub use layerkv_storage::{InMemoryStore, KeyValueStore};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
