//! Named transaction test vectors.
//!
//! Each vector is a sequence of operations together with the values its
//! `get` operations must observe and the mapping it must end with. Vectors
//! serialize to JSON so external drivers (the CLI, other embeddings) can
//! replay the same scenarios.

use crate::fixtures::apply_to_manager;
use crate::generators::Operation;
use layerkv_core::TransactionManager;
use layerkv_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A replayable transaction scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Operations to apply, in order.
    pub operations: Vec<Operation>,
    /// Values observed by each `get`, in order; `None` means absent.
    pub expected_reads: Vec<Option<String>>,
    /// Mapping after all operations.
    pub expected_entries: BTreeMap<String, String>,
}

impl TestVector {
    /// Replays the vector against a fresh manager.
    ///
    /// # Errors
    ///
    /// Returns a description of the first mismatch.
    pub fn run(&self) -> Result<(), String> {
        let mut tm = TransactionManager::new();
        let mut reads: Vec<Option<String>> = Vec::new();
        for op in &self.operations {
            match apply_to_manager(&mut tm, op) {
                Ok(Some(read)) => reads.push(read),
                Ok(None) => {}
                Err(err) => return Err(format!("{}: {op:?} failed: {err}", self.id)),
            }
        }

        if reads != self.expected_reads {
            return Err(format!(
                "{}: reads {:?}, expected {:?}",
                self.id, reads, self.expected_reads
            ));
        }
        let entries = tm.store().snapshot();
        if entries != self.expected_entries {
            return Err(format!(
                "{}: entries {:?}, expected {:?}",
                self.id, entries, self.expected_entries
            ));
        }
        Ok(())
    }
}

fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn read(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// The core begin/commit/rollback scenarios.
pub fn transaction_vectors() -> Vec<TestVector> {
    vec![
        TestVector {
            id: "top_level_set".into(),
            description: "A bare set is visible at once".into(),
            operations: vec![Operation::set("k", "v"), Operation::get("k")],
            expected_reads: vec![read("v")],
            expected_entries: entries(&[("k", "v")]),
        },
        TestVector {
            id: "commit_preserves".into(),
            description: "Committed writes stay applied".into(),
            operations: vec![
                Operation::set("k1", "v1"),
                Operation::Begin,
                Operation::set("k1", "v2"),
                Operation::Commit,
                Operation::get("k1"),
            ],
            expected_reads: vec![read("v2")],
            expected_entries: entries(&[("k1", "v2")]),
        },
        TestVector {
            id: "rollback_restores_value".into(),
            description: "Rollback restores the prior value".into(),
            operations: vec![
                Operation::set("k1", "v1"),
                Operation::Begin,
                Operation::set("k1", "v2"),
                Operation::Rollback,
                Operation::get("k1"),
            ],
            expected_reads: vec![read("v1")],
            expected_entries: entries(&[("k1", "v1")]),
        },
        TestVector {
            id: "rollback_restores_absence".into(),
            description: "Rollback removes a key the scope created".into(),
            operations: vec![
                Operation::Begin,
                Operation::set("k1", "v1"),
                Operation::Rollback,
                Operation::get("k1"),
            ],
            expected_reads: vec![None],
            expected_entries: BTreeMap::new(),
        },
        TestVector {
            id: "nested_commit".into(),
            description: "A committed child folds into its parent".into(),
            operations: vec![
                Operation::set("k1", "v1"),
                Operation::Begin,
                Operation::set("k1", "v2"),
                Operation::Begin,
                Operation::delete("k1"),
                Operation::Commit,
                Operation::get("k1"),
                Operation::Commit,
                Operation::get("k1"),
            ],
            expected_reads: vec![None, None],
            expected_entries: BTreeMap::new(),
        },
        TestVector {
            id: "nested_rollback".into(),
            description: "A rolled-back child leaves its parent's writes".into(),
            operations: vec![
                Operation::set("k1", "v1"),
                Operation::Begin,
                Operation::set("k1", "v2"),
                Operation::Begin,
                Operation::delete("k1"),
                Operation::Rollback,
                Operation::get("k1"),
                Operation::Commit,
                Operation::get("k1"),
            ],
            expected_reads: vec![read("v2"), read("v2")],
            expected_entries: entries(&[("k1", "v2")]),
        },
        TestVector {
            id: "lifo_rollback".into(),
            description: "Repeated writes unwind to the pre-scope value".into(),
            operations: vec![
                Operation::set("k", "orig"),
                Operation::Begin,
                Operation::set("k", "a"),
                Operation::set("k", "b"),
                Operation::set("k", "c"),
                Operation::Rollback,
                Operation::get("k"),
            ],
            expected_reads: vec![read("orig")],
            expected_entries: entries(&[("k", "orig")]),
        },
        TestVector {
            id: "idle_close".into(),
            description: "Commit and rollback with nothing open change nothing".into(),
            operations: vec![
                Operation::set("k", "v"),
                Operation::Commit,
                Operation::Rollback,
                Operation::get("k"),
            ],
            expected_reads: vec![read("v")],
            expected_entries: entries(&[("k", "v")]),
        },
        TestVector {
            id: "empty_value_from_absent".into(),
            description: "Rolling back an empty-string write removes the key".into(),
            operations: vec![
                Operation::Begin,
                Operation::set("k", ""),
                Operation::get("k"),
                Operation::Rollback,
                Operation::get("k"),
            ],
            expected_reads: vec![read(""), None],
            expected_entries: BTreeMap::new(),
        },
        TestVector {
            id: "empty_value_restored".into(),
            description: "Rollback restores a key that held the empty string".into(),
            operations: vec![
                Operation::set("k", ""),
                Operation::Begin,
                Operation::delete("k"),
                Operation::get("k"),
                Operation::Rollback,
                Operation::get("k"),
            ],
            expected_reads: vec![None, read("")],
            expected_entries: entries(&[("k", "")]),
        },
    ]
}

/// Serializes vectors to pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn vectors_to_json(vectors: &[TestVector]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(vectors)
}

/// Parses vectors from JSON.
///
/// # Errors
///
/// Returns an error if the JSON does not describe a list of vectors.
pub fn vectors_from_json(json: &str) -> serde_json::Result<Vec<TestVector>> {
    serde_json::from_str(json)
}
