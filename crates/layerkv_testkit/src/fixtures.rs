//! Fixtures for driving a transaction manager with operation sequences.

use crate::generators::Operation;
use crate::model::ReferenceModel;
use layerkv_core::{CoreResult, TransactionManager};
use layerkv_storage::KeyValueStore;

/// Applies one operation to a manager.
///
/// Returns the observed value for [`Operation::Get`], `None` otherwise.
///
/// # Errors
///
/// Returns the manager's error when a close is rejected, which only happens
/// under [`ClosePolicy::Strict`](layerkv_core::ClosePolicy::Strict) with
/// nothing open.
pub fn apply_to_manager<S: KeyValueStore>(
    tm: &mut TransactionManager<S>,
    op: &Operation,
) -> CoreResult<Option<Option<String>>> {
    match op {
        Operation::Set { key, value } => tm.set(key.as_str(), value.as_str()),
        Operation::Delete { key } => tm.delete(key.as_str()),
        Operation::Get { key } => return Ok(Some(tm.get(key).map(str::to_owned))),
        Operation::Begin => {
            tm.start_transaction();
        }
        Operation::Commit => tm.commit()?,
        Operation::Rollback => tm.rollback()?,
    }
    Ok(None)
}

/// Applies one operation to the reference model.
pub fn apply_to_model(model: &mut ReferenceModel, op: &Operation) -> Option<Option<String>> {
    match op {
        Operation::Set { key, value } => model.set(key, value),
        Operation::Delete { key } => model.delete(key),
        Operation::Get { key } => return Some(model.get(key).map(str::to_owned)),
        Operation::Begin => model.begin(),
        Operation::Commit => model.commit(),
        Operation::Rollback => model.rollback(),
    }
    None
}

/// Runs `ops` against a fresh manager and a fresh model, comparing state
/// after every step.
///
/// Also checks that the undo log is empty whenever no transaction is open.
///
/// # Errors
///
/// Returns a description of the first divergence.
pub fn assert_matches_model(ops: &[Operation]) -> Result<(), String> {
    let mut tm = TransactionManager::new();
    let mut model = ReferenceModel::new();

    for (step, op) in ops.iter().enumerate() {
        let observed = apply_to_manager(&mut tm, op)
            .map_err(|err| format!("step {step} ({op:?}): {err}"))?;
        let expected = apply_to_model(&mut model, op);

        if observed != expected {
            return Err(format!(
                "step {step} ({op:?}): read {observed:?}, model read {expected:?}"
            ));
        }
        if tm.depth() != model.depth() {
            return Err(format!(
                "step {step} ({op:?}): depth {}, model depth {}",
                tm.depth(),
                model.depth()
            ));
        }
        if &tm.store().snapshot() != model.entries() {
            return Err(format!(
                "step {step} ({op:?}): mapping {:?}, model mapping {:?}",
                tm.store().snapshot(),
                model.entries()
            ));
        }
        if tm.depth() == 0 && tm.log_len() != 0 {
            return Err(format!(
                "step {step} ({op:?}): {} undo records left with no open transaction",
                tm.log_len()
            ));
        }
    }
    Ok(())
}

/// Test scenario helpers.
pub mod scenarios {
    use layerkv_core::TransactionManager;

    /// Creates a manager with `count` committed keys `key0..keyN`.
    pub fn populated_manager(count: usize) -> TransactionManager {
        let mut tm = TransactionManager::new();
        for i in 0..count {
            tm.set(format!("key{i}"), format!("value{i}"));
        }
        tm
    }

    /// Creates a manager with `depth` open transactions, each of which
    /// overwrote `"level"` with its own depth.
    pub fn nested_manager(depth: usize) -> TransactionManager {
        let mut tm = TransactionManager::new();
        for level in 1..=depth {
            tm.start_transaction();
            tm.set("level", level.to_string());
        }
        tm
    }
}
