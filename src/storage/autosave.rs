//! Debounced snapshot writer.
//!
//! Mutations arrive in bursts (a form save touches several fields); the
//! writer coalesces rapid successive snapshots and persists only the latest
//! one after a quiet period. Failures are logged and swallowed: the next
//! mutation re-sends a full snapshot, which retries the write implicitly.

use std::{
    sync::{mpsc, Arc},
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, warn};

use crate::ledger::Ledger;

use super::StorageBackend;

enum Message {
    Snapshot(Ledger),
    Flush(mpsc::Sender<()>),
}

/// Handle to the background autosave thread. Dropping it flushes any pending
/// snapshot and joins the thread.
pub struct AutosaveHandle {
    tx: Option<mpsc::Sender<Message>>,
    worker: Option<JoinHandle<()>>,
}

impl AutosaveHandle {
    pub fn spawn(storage: Arc<dyn StorageBackend>, quiet_period: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("spendtrack-autosave".into())
            .spawn(move || run(storage, rx, quiet_period))
            .expect("failed to spawn autosave thread");
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queues a snapshot for writing after the quiet period. Later snapshots
    /// supersede earlier unwritten ones wholesale.
    pub fn schedule(&self, ledger: Ledger) {
        if let Some(tx) = &self.tx {
            // A send failure means the worker is gone; flush-on-drop already
            // happened or the thread panicked, either way nothing to do here.
            let _ = tx.send(Message::Snapshot(ledger));
        }
    }

    /// Writes any pending snapshot now and waits for the write to finish.
    pub fn flush(&self) {
        if let Some(tx) = &self.tx {
            let (ack_tx, ack_rx) = mpsc::channel();
            if tx.send(Message::Flush(ack_tx)).is_ok() {
                let _ = ack_rx.recv();
            }
        }
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.flush();
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run(storage: Arc<dyn StorageBackend>, rx: mpsc::Receiver<Message>, quiet_period: Duration) {
    let mut pending: Option<Ledger> = None;
    loop {
        let message = if pending.is_some() {
            match rx.recv_timeout(quiet_period) {
                Ok(message) => message,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    write_pending(&storage, &mut pending);
                    continue;
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match rx.recv() {
                Ok(message) => message,
                Err(_) => break,
            }
        };

        match message {
            Message::Snapshot(ledger) => pending = Some(ledger),
            Message::Flush(ack) => {
                write_pending(&storage, &mut pending);
                let _ = ack.send(());
            }
        }
    }
    write_pending(&storage, &mut pending);
}

fn write_pending(storage: &Arc<dyn StorageBackend>, pending: &mut Option<Ledger>) {
    if let Some(ledger) = pending.take() {
        match storage.save(&ledger) {
            Ok(()) => debug!("autosaved ledger snapshot"),
            Err(err) => warn!("autosave failed, will retry on next change: {err}"),
        }
    }
}
