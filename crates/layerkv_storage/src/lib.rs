//! # LayerKV Storage
//!
//! The raw key-value mapping underneath LayerKV.
//!
//! This crate provides the lowest-level abstraction: a flat mapping of
//! string keys to string values with no knowledge of transactions.
//! Stores are **transaction-unaware** - every undo record, scope and
//! rollback lives in `layerkv_core`, which is the only intended caller
//! of the raw mutators.
//!
//! ## Design Principles
//!
//! - Lookups are pure and never fail
//! - `raw_set` / `raw_delete` are unconditional and never fail
//! - An absent key and a key holding `""` are distinct states
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - `HashMap`-backed mapping
//!
//! ## Example
//!
//! ```rust
//! use layerkv_storage::{InMemoryStore, KeyValueStore};
//!
//! let mut store = InMemoryStore::new();
//! store.raw_set("hello".into(), "world".into());
//! assert_eq!(store.get("hello"), Some("world"));
//!
//! store.raw_delete("hello");
//! assert_eq!(store.get("hello"), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod memory;

pub use backend::KeyValueStore;
pub use memory::InMemoryStore;
