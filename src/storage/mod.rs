pub mod autosave;
pub mod json_backend;

use crate::{errors::TrackerError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Abstraction over persistence backends capable of storing the ledger
/// snapshot. The whole ledger is written and read as one value.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored snapshot, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Ledger>>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
}

pub use autosave::AutosaveHandle;
pub use json_backend::JsonStore;
