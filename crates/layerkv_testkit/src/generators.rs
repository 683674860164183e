//! Property-based test generators using proptest.
//!
//! Keys are drawn from a small alphabet so that generated sequences
//! revisit the same keys often, and values include the empty string so the
//! empty-versus-absent distinction is exercised.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

/// One call against the transactional store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Set a key.
    Set {
        /// Key
        key: String,
        /// Value
        value: String,
    },
    /// Delete a key.
    Delete {
        /// Key
        key: String,
    },
    /// Read a key.
    Get {
        /// Key
        key: String,
    },
    /// Open a nested transaction.
    Begin,
    /// Commit the active transaction.
    Commit,
    /// Roll back the active transaction.
    Rollback,
}

impl Operation {
    /// Shorthand for [`Operation::Set`].
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Shorthand for [`Operation::Delete`].
    pub fn delete(key: impl Into<String>) -> Self {
        Self::Delete { key: key.into() }
    }

    /// Shorthand for [`Operation::Get`].
    pub fn get(key: impl Into<String>) -> Self {
        Self::Get { key: key.into() }
    }
}

/// Strategy for generating keys from a small alphabet.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-d]").expect("Invalid regex")
}

/// Strategy for generating values, including the empty string.
pub fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        4 => prop::string::string_regex("[a-z0-9]{1,6}").expect("Invalid regex"),
    ]
}

/// Strategy for generating a single operation.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| Operation::Set { key, value }),
        2 => key_strategy().prop_map(|key| Operation::Delete { key }),
        2 => key_strategy().prop_map(|key| Operation::Get { key }),
        2 => Just(Operation::Begin),
        1 => Just(Operation::Commit),
        1 => Just(Operation::Rollback),
    ]
}

/// Strategy for generating a sequence of operations.
///
/// Sequences may close more scopes than they open and may leave scopes open.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn keys_come_from_small_alphabet(key in key_strategy()) {
            prop_assert_eq!(key.len(), 1);
            prop_assert!(('a'..='d').contains(&key.chars().next().unwrap()));
        }

        #[test]
        fn sequence_respects_bounds(ops in operation_sequence_strategy(2, 10)) {
            prop_assert!(ops.len() >= 2 && ops.len() < 10);
        }
    }

    #[test]
    fn operation_json_shape() {
        let json = serde_json::to_string(&Operation::set("k", "")).unwrap();
        assert_eq!(json, r#"{"op":"set","key":"k","value":""}"#);

        let op: Operation = serde_json::from_str(r#"{"op":"rollback"}"#).unwrap();
        assert_eq!(op, Operation::Rollback);
    }
}
