//! Runs the `layerkv` binary against script files.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_script(script: &str, extra: &[&str]) -> Output {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("script.lkv");
    fs::write(&path, script).unwrap();

    Command::new(env!("CARGO_BIN_EXE_layerkv"))
        .arg("run")
        .arg(&path)
        .args(extra)
        .output()
        .unwrap()
}

#[test]
fn run_prints_get_results() {
    let output = run_script(
        "SET key1 value1\nBEGIN\nSET key1 value2\nROLLBACK\nGET key1\nBEGIN\nSET key2 x\nROLLBACK\nGET key2\n",
        &[],
    );

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "value1\nNULL\n");
}

#[test]
fn run_json_reports_final_state() {
    let output = run_script(
        "SET a 1\nBEGIN\nSET b \"\"\nGET b\n",
        &["--format", "json"],
    );

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outputs"][0], "");
    assert_eq!(report["entries"]["a"], "1");
    assert_eq!(report["entries"]["b"], "");
    assert_eq!(report["open_transactions"], 1);
    assert_eq!(report["undo_records"], 1);
    assert_eq!(report["stats"]["implicit"], 1);
}

#[test]
fn run_strict_fails_on_idle_commit() {
    let output = run_script("SET a 1\nCOMMIT\n", &["--strict"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no active transaction to commit"));
}

#[test]
fn run_rejects_unknown_format() {
    let output = run_script("GET a\n", &["--format", "yaml"]);
    assert!(!output.status.success());
}
