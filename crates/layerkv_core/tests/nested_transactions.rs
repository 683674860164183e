//! End-to-end transaction scenarios through the public API.

use layerkv_core::{
    ClosePolicy, Config, CoreError, Database, InMemoryStore, KeyValueStore, OperationKind,
    TransactionManager,
};
use std::sync::Arc;
use std::thread;

#[test]
fn commit_overwrites_committed_value() {
    let mut tm = TransactionManager::new();
    tm.set("key1", "value1");
    tm.start_transaction();
    tm.set("key1", "value2");
    tm.commit().unwrap();
    assert_eq!(tm.get("key1"), Some("value2"));
}

#[test]
fn nested_delete_commit_and_rollback() {
    let mut tm = TransactionManager::new();
    tm.set("key1", "value1");
    tm.start_transaction();
    tm.set("key1", "value2");
    assert_eq!(tm.get("key1"), Some("value2"));
    tm.start_transaction();
    assert_eq!(tm.get("key1"), Some("value2"));
    tm.delete("key1");
    tm.commit().unwrap();
    assert_eq!(tm.get("key1"), None);
    tm.commit().unwrap();
    assert_eq!(tm.get("key1"), None);

    let mut tm = TransactionManager::new();
    tm.set("key1", "value1");
    tm.start_transaction();
    tm.set("key1", "value2");
    tm.start_transaction();
    tm.delete("key1");
    tm.rollback().unwrap();
    assert_eq!(tm.get("key1"), Some("value2"));
    tm.commit().unwrap();
    assert_eq!(tm.get("key1"), Some("value2"));
}

#[test]
fn sibling_scopes_after_close() {
    let mut tm = TransactionManager::new();
    tm.start_transaction();
    tm.set("a", "1");

    let first = tm.start_transaction();
    tm.set("b", "2");
    tm.rollback().unwrap();

    let second = tm.start_transaction();
    assert_ne!(first, second);
    assert!(!tm.is_open(first));
    tm.set("c", "3");
    tm.commit().unwrap();
    tm.commit().unwrap();

    let snapshot = tm.store().snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot["a"], "1");
    assert_eq!(snapshot["c"], "3");
    assert_eq!(tm.log_len(), 0);
}

#[test]
fn log_records_capture_prior_state() {
    let mut tm = TransactionManager::new();
    tm.set("k", "");
    let txid = tm.start_transaction();
    tm.set("k", "x");
    tm.delete("k");
    tm.set("fresh", "y");

    let records: Vec<_> = tm.log().iter().collect();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.transaction() == txid));

    assert_eq!(records[0].kind(), OperationKind::Set);
    assert_eq!(records[0].prior(), Some(""));
    assert_eq!(records[1].kind(), OperationKind::Delete);
    assert_eq!(records[1].prior(), Some("x"));
    assert_eq!(records[2].key(), "fresh");
    assert!(!records[2].existed());

    tm.rollback().unwrap();
    assert_eq!(tm.get("k"), Some(""));
    assert_eq!(tm.get("fresh"), None);
}

#[test]
fn custom_store_through_manager() {
    let store = InMemoryStore::with_entries([("seed", "1")]);
    let config = Config::new()
        .close_policy(ClosePolicy::Strict)
        .log_capacity(4);
    let mut tm = TransactionManager::with_store(store, config);

    assert_eq!(tm.config().close_policy, ClosePolicy::Strict);
    assert!(matches!(
        tm.commit(),
        Err(CoreError::NoActiveTransaction { .. })
    ));

    tm.start_transaction();
    tm.set("seed", "2");
    tm.commit().unwrap();
    assert_eq!(tm.into_store().get("seed"), Some("2"));
}

#[test]
fn shared_database_across_threads() {
    let db = Arc::new(Database::open_in_memory());
    let mut handles = Vec::new();

    for t in 0..4 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                let key = format!("t{t}-k{i}");
                let result: Result<(), CoreError> = db.transaction(|txn| {
                    txn.set(key.clone(), "pending");
                    if i % 2 == 0 {
                        txn.set(key.clone(), "kept");
                        Ok(())
                    } else {
                        Err(CoreError::transaction_aborted("odd"))
                    }
                });
                assert_eq!(result.is_ok(), i % 2 == 0);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(db.depth(), 0);
    let snapshot = db.with_manager(|m| {
        assert_eq!(m.log_len(), 0);
        m.store().snapshot()
    });
    assert_eq!(snapshot.len(), 4 * 25);
    assert!(snapshot.values().all(|v| v == "kept"));

    let stats = db.stats();
    assert_eq!(stats.transactions_committed, 4 * 25);
    assert_eq!(stats.transactions_rolled_back, 4 * 25);
    assert_eq!(stats.open_transactions(), 0);
}
