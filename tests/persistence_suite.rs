use std::fs;

use chrono::NaiveDate;
use spendtrack::{
    ledger::{Category, CommitmentDraft, Ledger},
    storage::{JsonStore, StorageBackend},
};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> JsonStore {
    JsonStore::new(dir.path().join("ledger.json"))
}

fn populated_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger.set_salary(45_000.0);
    ledger.add_commitment(CommitmentDraft {
        title: "House EMI".into(),
        amount: 18_000.0,
        category: Category::Emi,
        start_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        end_date: Some(NaiveDate::from_ymd_opt(2030, 1, 31).unwrap()),
        day_of_month: Some(5),
        note: Some("20 year loan, refinanced".into()),
    });
    ledger
}

#[test]
fn load_returns_none_before_first_save() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert!(store.load().unwrap().is_none());
}

#[test]
fn snapshot_roundtrips() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let ledger = populated_ledger();

    store.save(&ledger).unwrap();
    let restored = store.load().unwrap().expect("snapshot present");
    assert_eq!(restored, ledger);
}

#[test]
fn later_saves_replace_the_snapshot_wholesale() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut ledger = populated_ledger();
    store.save(&ledger).unwrap();
    ledger.set_salary(60_000.0);
    let id = ledger.commitments[0].id;
    ledger.remove_commitment(id);
    store.save(&ledger).unwrap();

    let restored = store.load().unwrap().unwrap();
    assert_eq!(restored.salary_monthly, 60_000.0);
    assert_eq!(restored.commitment_count(), 0);
}

#[test]
fn corrupt_snapshot_surfaces_an_error() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "{ not json").unwrap();
    assert!(store.load().is_err());
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&populated_ledger()).unwrap();

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
