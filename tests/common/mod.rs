use std::{sync::Arc, time::Duration};

use spendtrack::{session::Session, storage::JsonStore};
use tempfile::TempDir;

/// Session backed by a JSON store inside a fresh temp directory. The
/// directory guard must outlive the session.
pub fn temp_session(autosave_delay_ms: u64) -> (Session, JsonStore, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let store = JsonStore::new(dir.path().join("ledger.json"));
    let session = Session::open(
        Arc::new(store.clone()),
        Duration::from_millis(autosave_delay_ms),
    );
    (session, store, dir)
}
