//! # LayerKV Testkit
//!
//! Test utilities for LayerKV.
//!
//! This crate provides:
//! - A naive snapshot-per-scope [`ReferenceModel`] to check the undo log against
//! - Property-based operation generators using proptest
//! - Fixtures for applying operation sequences to a manager
//! - Named JSON test vectors for the core transaction scenarios
//!
//! ## Usage
//!
//! ```rust,ignore
//! use layerkv_testkit::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn matches_model(ops in operation_sequence_strategy(0, 64)) {
//!         prop_assert!(assert_matches_model(&ops).is_ok());
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
pub use vectors::*;
