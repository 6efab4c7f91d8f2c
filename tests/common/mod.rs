#![allow(dead_code)]

use std::sync::Mutex;

use finance_core::{
    ledger::NewTransaction,
    storage::{LedgerStore, MemoryStore, MissingIdPolicy, SqliteStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so SQLite files live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Memory,
    Sqlite,
}

pub const BACKENDS: [Backend; 2] = [Backend::Memory, Backend::Sqlite];

/// Fresh, empty store of the given kind, each SQLite store in its own directory.
pub fn fresh_store(backend: Backend, policy: MissingIdPolicy) -> Box<dyn LedgerStore> {
    match backend {
        Backend::Memory => Box::new(MemoryStore::with_policy(policy)),
        Backend::Sqlite => {
            let temp = TempDir::new().expect("create temp dir");
            let path = temp.path().join("ledger.db");
            TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
            Box::new(SqliteStore::open(path, policy).expect("open sqlite store"))
        }
    }
}

/// Runs `check` once per backend with the default (ignore) policy.
pub fn for_each_backend(mut check: impl FnMut(Backend, &mut dyn LedgerStore)) {
    for backend in BACKENDS {
        let mut store = fresh_store(backend, MissingIdPolicy::Ignore);
        check(backend, store.as_mut());
    }
}

/// Salary plus two food expenses in January 2024.
pub fn seed_january(store: &mut dyn LedgerStore) {
    for txn in [
        NewTransaction::income("Salary", 1000.0, "2024-01-05"),
        NewTransaction::expense("Food", 200.0, "2024-01-10"),
        NewTransaction::expense("Food", 50.0, "2024-01-20"),
    ] {
        store.add_transaction(txn).expect("seed transaction");
    }
}
