mod common;

use std::{
    fs,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use chrono::NaiveDate;
use spendtrack::{
    ledger::{Category, CommitmentDraft, CommitmentPatch},
    session::Session,
    storage::{JsonStore, StorageBackend},
};
use tempfile::TempDir;
use uuid::Uuid;

fn draft(title: &str, amount: f64) -> CommitmentDraft {
    CommitmentDraft {
        title: title.into(),
        amount,
        category: Category::Emi,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end_date: None,
        day_of_month: None,
        note: None,
    }
}

#[test]
fn opens_with_defaults_when_nothing_is_stored() {
    let (session, _store, _dir) = common::temp_session(10);
    assert_eq!(session.ledger().salary_monthly, 0.0);
    assert_eq!(session.ledger().commitment_count(), 0);
    assert_eq!(session.revision(), 0);
}

#[test]
fn opens_with_defaults_when_the_snapshot_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.json");
    fs::write(&path, "not json at all").unwrap();
    let store = JsonStore::new(path);
    let session = Session::open(Arc::new(store), Duration::from_millis(10));
    assert_eq!(session.ledger().commitment_count(), 0);
    assert_eq!(session.ledger().salary_monthly, 0.0);
}

#[test]
fn mutations_bump_the_revision_and_prepend() {
    let (mut session, _store, _dir) = common::temp_session(10);
    session.set_salary(40_000.0);
    let first = session.add_commitment(draft("first", 100.0));
    let second = session.add_commitment(draft("second", 200.0));
    assert_eq!(session.revision(), 3);
    assert_ne!(first, second);
    assert_eq!(session.ledger().commitments[0].id, second);
    assert_eq!(session.ledger().commitments[1].id, first);
}

#[test]
fn update_merges_and_unknown_ids_are_noops() {
    let (mut session, _store, _dir) = common::temp_session(10);
    let id = session.add_commitment(draft("rent", 1_500.0));

    let updated = session.update_commitment(
        id,
        CommitmentPatch {
            amount: Some(1_750.0),
            ..Default::default()
        },
    );
    assert!(updated);
    assert_eq!(session.ledger().commitment(id).unwrap().amount, 1_750.0);
    assert_eq!(session.ledger().commitment(id).unwrap().title, "rent");

    let revision = session.revision();
    assert!(!session.update_commitment(Uuid::new_v4(), CommitmentPatch::default()));
    assert!(!session.remove_commitment(Uuid::new_v4()));
    assert_eq!(session.revision(), revision);
}

#[test]
fn subscribers_observe_every_committed_snapshot() {
    let (mut session, _store, _dir) = common::temp_session(10);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    session.subscribe(move |ledger| {
        sink.lock().unwrap().push(ledger.salary_monthly);
    });

    session.set_salary(10_000.0);
    session.set_salary(20_000.0);
    // No-op mutations publish nothing.
    session.remove_commitment(Uuid::new_v4());

    assert_eq!(*seen.lock().unwrap(), vec![10_000.0, 20_000.0]);
}

#[test]
fn rapid_mutations_coalesce_into_the_latest_snapshot() {
    let (mut session, store, _dir) = common::temp_session(50);
    session.set_salary(10_000.0);
    session.set_salary(25_000.0);
    session.add_commitment(draft("burst", 500.0));
    session.flush();

    let stored = store.load().unwrap().expect("snapshot written");
    assert_eq!(stored.salary_monthly, 25_000.0);
    assert_eq!(stored.commitment_count(), 1);
}

#[test]
fn quiet_period_elapses_and_writes_without_an_explicit_flush() {
    let (mut session, store, _dir) = common::temp_session(20);
    session.set_salary(33_000.0);
    std::thread::sleep(Duration::from_millis(200));
    let stored = store.load().unwrap().expect("snapshot written");
    assert_eq!(stored.salary_monthly, 33_000.0);
}

#[test]
fn reload_picks_up_an_externally_written_snapshot() {
    let (mut session, store, _dir) = common::temp_session(10);
    session.set_salary(5_000.0);
    session.flush();

    let mut external = store.load().unwrap().unwrap();
    external.set_salary(99_000.0);
    store.save(&external).unwrap();

    session.reload();
    assert_eq!(session.ledger().salary_monthly, 99_000.0);
}

#[test]
fn save_failures_are_swallowed() {
    struct FailingStore(AtomicUsize);
    impl StorageBackend for FailingStore {
        fn load(&self) -> spendtrack::storage::Result<Option<spendtrack::ledger::Ledger>> {
            Ok(None)
        }
        fn save(&self, _: &spendtrack::ledger::Ledger) -> spendtrack::storage::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(spendtrack::errors::TrackerError::Validation(
                "disk full".into(),
            ))
        }
    }

    let store = Arc::new(FailingStore(AtomicUsize::new(0)));
    let mut session = Session::open(
        Arc::clone(&store) as Arc<dyn StorageBackend>,
        Duration::from_millis(10),
    );
    session.set_salary(1_000.0);
    session.flush();
    // The mutation survives in memory even though the write failed.
    assert_eq!(session.ledger().salary_monthly, 1_000.0);
    assert!(store.0.load(Ordering::SeqCst) >= 1);
}
