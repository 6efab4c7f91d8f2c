mod common;

use std::fs;

use common::{fresh_store, Backend};
use finance_core::{
    config::{BackendKind, Config, ConfigManager},
    ledger::{NewGoal, NewTransaction},
    storage::{
        load_snapshot_from_path, save_snapshot_to_path, LedgerReader, LedgerStore, MemoryStore,
        MissingIdPolicy, SqliteStore,
    },
};
use tempfile::tempdir;

fn populate(store: &mut dyn LedgerStore) {
    for txn in [
        NewTransaction::income("Salary", 2500.0, "2024-02-01"),
        NewTransaction::expense("Food", 80.0, "2024-02-03").with_description("groceries"),
        NewTransaction::expense("Fuel", 45.0, "2024-02-04"),
    ] {
        store.add_transaction(txn).unwrap();
    }
    store.delete_transaction(3).unwrap();
    store.upsert_budget("Food", 300.0, "2024-02").unwrap();
    store
        .add_goal(NewGoal::new("Trip", 1200.0).with_deadline("2024-08-01"))
        .unwrap();
}

#[test]
fn sqlite_snapshot_restores_into_memory_with_counters() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.json");

    let mut sqlite = fresh_store(Backend::Sqlite, MissingIdPolicy::Ignore);
    populate(sqlite.as_mut());
    let snapshot = sqlite.snapshot().unwrap();
    assert_eq!(snapshot.next_ids.transaction, 4);
    save_snapshot_to_path(&snapshot, &path).unwrap();

    let mut memory =
        MemoryStore::from_snapshot(load_snapshot_from_path(&path).unwrap(), MissingIdPolicy::Ignore);
    assert_eq!(memory.transactions().unwrap(), sqlite.transactions().unwrap());
    assert_eq!(memory.budgets().unwrap(), sqlite.budgets().unwrap());
    assert_eq!(memory.goals().unwrap(), sqlite.goals().unwrap());

    let next = memory
        .add_transaction(NewTransaction::expense("Fuel", 45.0, "2024-02-05"))
        .unwrap();
    assert_eq!(next.id, 4);
    let budget = memory.upsert_budget("Food", 350.0, "2024-02").unwrap();
    assert_eq!(memory.budgets().unwrap().len(), 1);
    assert_eq!(budget.amount, 350.0);
}

#[test]
fn failed_export_preserves_the_previous_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let mut store = MemoryStore::new();
    populate(&mut store);
    save_snapshot_to_path(&store.snapshot().unwrap(), &path).unwrap();
    let original = fs::read_to_string(&path).unwrap();

    // A directory at the staging path makes the temporary write fail.
    fs::create_dir_all(dir.path().join("ledger.json.tmp")).unwrap();
    store
        .add_transaction(NewTransaction::income("Bonus", 300.0, "2024-02-20"))
        .unwrap();
    assert!(save_snapshot_to_path(&store.snapshot().unwrap(), &path).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn sqlite_ledger_survives_reopening_through_config() {
    let dir = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
    let config = Config {
        backend: BackendKind::Sqlite,
        ..Config::default()
    };
    manager.save(&config).unwrap();

    {
        let mut store = manager
            .load()
            .unwrap()
            .open_store(manager.base_dir())
            .unwrap();
        populate(store.as_mut());
    }

    let reopened = SqliteStore::open(dir.path().join("ledger.db"), MissingIdPolicy::Ignore).unwrap();
    let transactions = reopened.transactions().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[1].description.as_deref(), Some("groceries"));
    assert_eq!(reopened.goals().unwrap()[0].deadline.as_deref(), Some("2024-08-01"));
}
