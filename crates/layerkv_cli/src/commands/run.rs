//! Run command implementation.

use crate::commands::script::Session;
use layerkv_core::{Config, KeyValueStore, TransactionStats};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Result of running a script, for `--format json`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Script path.
    pub script: String,
    /// Lines printed by GET, DEPTH, DUMP and STATS, in order.
    pub outputs: Vec<String>,
    /// Mapping after the last line.
    pub entries: BTreeMap<String, String>,
    /// Transactions still open after the last line.
    pub open_transactions: usize,
    /// Undo records still held.
    pub undo_records: usize,
    /// Counters.
    pub stats: StatsReport,
}

/// Serializable copy of [`TransactionStats`].
#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Transactions opened.
    pub started: u64,
    /// Transactions committed.
    pub committed: u64,
    /// Transactions rolled back.
    pub rolled_back: u64,
    /// Implicit single-write transactions.
    pub implicit: u64,
    /// Sets applied.
    pub sets: u64,
    /// Deletes applied.
    pub deletes: u64,
    /// Undo records replayed.
    pub records_undone: u64,
    /// Deepest nesting reached.
    pub max_depth: usize,
}

impl From<TransactionStats> for StatsReport {
    fn from(stats: TransactionStats) -> Self {
        Self {
            started: stats.transactions_started,
            committed: stats.transactions_committed,
            rolled_back: stats.transactions_rolled_back,
            implicit: stats.implicit_transactions,
            sets: stats.sets,
            deletes: stats.deletes,
            records_undone: stats.records_undone,
            max_depth: stats.max_depth,
        }
    }
}

/// Executes every line of `source`, stopping at the first error.
pub fn execute(
    session: &mut Session,
    source: &str,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut outputs = Vec::new();
    for (index, text) in source.lines().enumerate() {
        if let Some(output) = session.run_line(text, index + 1)? {
            outputs.push(output);
        }
    }
    Ok(outputs)
}

/// Runs the run command.
pub fn run(path: &Path, config: Config, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if format != "text" && format != "json" {
        return Err(format!("Unknown format '{}', expected text or json", format).into());
    }

    info!("Running script {:?}", path);
    let source = fs::read_to_string(path)?;

    let mut session = Session::new(config);
    let outputs = execute(&mut session, &source)?;

    let manager = session.manager();
    if manager.depth() > 0 {
        warn!(
            depth = manager.depth(),
            "script ended with open transactions"
        );
    }

    if format == "json" {
        let report = RunReport {
            script: path.display().to_string(),
            outputs,
            entries: manager.store().snapshot(),
            open_transactions: manager.depth(),
            undo_records: manager.log_len(),
            stats: manager.stats().into(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for output in outputs {
            println!("{output}");
        }
    }

    Ok(())
}
