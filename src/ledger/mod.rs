//! Ledger domain models, persistence-friendly types, and the computation core.

pub mod activity;
pub mod breakdown;
pub mod commitment;
#[allow(clippy::module_inception)]
pub mod ledger;

pub use activity::{active_in_month, active_on, effective_end};
pub use breakdown::{evaluate, Breakdown, CategoryTotals, Slice};
pub use commitment::{Category, Commitment, CommitmentDraft, CommitmentPatch, ScheduleProgress};
pub use ledger::Ledger;
