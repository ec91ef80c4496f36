//! Process-wide state container for one user session.
//!
//! The session owns the ledger snapshot and is the only writer. Every
//! mutation is applied to a fresh clone which then replaces the snapshot
//! wholesale, so subscribers and the autosave writer always observe complete
//! states, never partial edits.

use std::{sync::Arc, time::Duration};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    ledger::{CommitmentDraft, CommitmentPatch, Ledger},
    storage::{AutosaveHandle, StorageBackend},
};

type Listener = Box<dyn FnMut(&Ledger) + Send>;

pub struct Session {
    ledger: Ledger,
    revision: u64,
    listeners: Vec<Listener>,
    storage: Arc<dyn StorageBackend>,
    autosave: AutosaveHandle,
}

impl Session {
    /// Loads the stored snapshot, falling back to an empty default ledger
    /// when nothing is stored or the stored data cannot be read.
    pub fn open(storage: Arc<dyn StorageBackend>, autosave_delay: Duration) -> Self {
        let ledger = match storage.load() {
            Ok(Some(ledger)) => ledger,
            Ok(None) => {
                info!("no stored ledger, starting fresh");
                Ledger::new()
            }
            Err(err) => {
                warn!("failed to load stored ledger, starting fresh: {err}");
                Ledger::new()
            }
        };
        let autosave = AutosaveHandle::spawn(Arc::clone(&storage), autosave_delay);
        Self {
            ledger,
            revision: 0,
            listeners: Vec::new(),
            storage,
            autosave,
        }
    }

    /// Current snapshot. Borrow only; mutations go through the methods below.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Monotonic counter bumped once per committed mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a callback invoked with each new snapshot after a mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&Ledger) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_salary(&mut self, amount: f64) {
        self.commit(|ledger| {
            ledger.set_salary(amount);
        });
    }

    pub fn add_commitment(&mut self, draft: CommitmentDraft) -> Uuid {
        let mut id = Uuid::nil();
        self.commit(|ledger| {
            id = ledger.add_commitment(draft);
        });
        id
    }

    /// No-op (no notification, no save) when the id is unknown.
    pub fn update_commitment(&mut self, id: Uuid, patch: CommitmentPatch) -> bool {
        self.commit_if(|ledger| ledger.update_commitment(id, patch))
    }

    /// No-op (no notification, no save) when the id is unknown.
    pub fn remove_commitment(&mut self, id: Uuid) -> bool {
        self.commit_if(|ledger| ledger.remove_commitment(id))
    }

    /// Replaces the snapshot with whatever is currently stored, e.g. after an
    /// external restore. Keeps the current snapshot when loading fails.
    pub fn reload(&mut self) {
        match self.storage.load() {
            Ok(Some(ledger)) => {
                self.ledger = ledger;
                self.revision += 1;
                self.notify();
            }
            Ok(None) => info!("reload requested but no stored ledger exists"),
            Err(err) => warn!("reload failed, keeping current snapshot: {err}"),
        }
    }

    /// Forces any pending autosave write to complete now.
    pub fn flush(&self) {
        self.autosave.flush();
    }

    fn commit(&mut self, apply: impl FnOnce(&mut Ledger)) {
        self.commit_if(|ledger| {
            apply(ledger);
            true
        });
    }

    fn commit_if(&mut self, apply: impl FnOnce(&mut Ledger) -> bool) -> bool {
        let mut next = self.ledger.clone();
        if !apply(&mut next) {
            return false;
        }
        self.ledger = next;
        self.revision += 1;
        self.notify();
        self.autosave.schedule(self.ledger.clone());
        true
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.ledger);
        }
    }
}
