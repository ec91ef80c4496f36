use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commitment::{Commitment, CommitmentDraft, CommitmentPatch};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The persisted aggregate: monthly salary plus the commitment collection,
/// newest first. Single source of truth for one user session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    pub salary_monthly: f64,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            salary_monthly: 0.0,
            commitments: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Sets the monthly salary. Negative or non-finite input collapses to 0;
    /// the salary is non-negative by invariant.
    pub fn set_salary(&mut self, amount: f64) {
        self.salary_monthly = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.touch();
    }

    /// Adds a commitment built from the draft, assigning a fresh id and
    /// creation timestamp, and prepends it (newest first).
    pub fn add_commitment(&mut self, draft: CommitmentDraft) -> Uuid {
        let commitment = Commitment::from_draft(draft);
        let id = commitment.id;
        self.commitments.insert(0, commitment);
        self.touch();
        id
    }

    /// Merges the patch into the matching commitment. Silent no-op when the
    /// id is unknown; returns whether anything was updated.
    pub fn update_commitment(&mut self, id: Uuid, patch: CommitmentPatch) -> bool {
        match self.commitments.iter_mut().find(|c| c.id == id) {
            Some(commitment) => {
                commitment.apply_patch(patch);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Removes the matching commitment. Silent no-op when the id is unknown;
    /// returns whether anything was removed.
    pub fn remove_commitment(&mut self, id: Uuid) -> bool {
        let before = self.commitments.len();
        self.commitments.retain(|c| c.id != id);
        let removed = self.commitments.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn commitment(&self, id: Uuid) -> Option<&Commitment> {
        self.commitments.iter().find(|c| c.id == id)
    }

    pub fn commitment_count(&self) -> usize {
        self.commitments.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
