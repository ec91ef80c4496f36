use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::TrackerError;

/// Categorises a commitment for the monthly breakdown.
///
/// The set is closed; snapshots written by older builds may carry labels
/// outside it, and those fold into `Other` on load.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "EMI")]
    Emi,
    #[serde(rename = "SAVING")]
    Saving,
    #[serde(rename = "OTHER")]
    Other,
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::parse(&raw).unwrap_or(Category::Other))
    }
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Emi, Category::Saving, Category::Other];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Emi => "EMI",
            Category::Saving => "SAVING",
            Category::Other => "OTHER",
        }
    }

    pub fn parse(input: &str) -> Option<Category> {
        match input.to_ascii_uppercase().as_str() {
            "EMI" => Some(Category::Emi),
            "SAVING" | "SAVE" => Some(Category::Saving),
            "OTHER" => Some(Category::Other),
            _ => None,
        }
    }
}

/// A recurring or bounded financial obligation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commitment {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Commitment {
    /// Builds a commitment from user-entered fields, assigning a fresh id and
    /// creation timestamp. Drafts cannot carry either, so callers can never
    /// smuggle their own.
    pub fn from_draft(draft: CommitmentDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            amount: draft.amount,
            category: draft.category,
            start_date: draft.start_date,
            end_date: draft.end_date,
            day_of_month: draft.day_of_month,
            note: draft.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            created_at: Utc::now(),
        }
    }

    /// Merges the present fields of a patch into this commitment. Absent
    /// fields are left untouched; `end_date`, `day_of_month`, and `note`
    /// distinguish "leave alone" (outer `None`) from "clear" (inner `None`).
    pub fn apply_patch(&mut self, patch: CommitmentPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(day_of_month) = patch.day_of_month {
            self.day_of_month = day_of_month;
        }
        if let Some(note) = patch.note {
            self.note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        }
    }

    /// Amount as seen by the aggregator: non-finite values (a corrupted or
    /// hand-edited snapshot) coerce to zero rather than poisoning the totals.
    pub fn sanitized_amount(&self) -> f64 {
        if self.amount.is_finite() {
            self.amount
        } else {
            0.0
        }
    }

    pub fn is_open_ended(&self) -> bool {
        self.end_date.is_none()
    }

    /// Completed/total installment counts for a bounded commitment, `None`
    /// when open-ended. Counts are whole calendar months inclusive of both
    /// the start and end months.
    pub fn progress(&self, today: NaiveDate) -> Option<ScheduleProgress> {
        let end = self.end_date?;
        let total = months_between(self.start_date, end).max(0) + 1;
        let completed = if today < self.start_date {
            0
        } else {
            (months_between(self.start_date, today) + 1).clamp(0, total)
        };
        Some(ScheduleProgress {
            completed: completed as u32,
            total: total as u32,
            ratio: completed as f64 / total as f64,
        })
    }
}

/// Position within a bounded commitment's schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleProgress {
    pub completed: u32,
    pub total: u32,
    pub ratio: f64,
}

/// User-entered fields for a new commitment.
#[derive(Debug, Clone)]
pub struct CommitmentDraft {
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub day_of_month: Option<u8>,
    pub note: Option<String>,
}

impl CommitmentDraft {
    /// Entry-time validation. Aggregation never validates; bad values are
    /// meant to be caught here, when the user can still fix them.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.title.trim().is_empty() {
            return Err(TrackerError::Validation("title must not be empty".into()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(TrackerError::Validation("amount must be positive".into()));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(TrackerError::Validation(format!(
                    "end date {} precedes start date {}",
                    end, self.start_date
                )));
            }
        }
        if let Some(day) = self.day_of_month {
            if !(1..=31).contains(&day) {
                return Err(TrackerError::Validation(
                    "day of month must be between 1 and 31".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Partial update for an existing commitment.
#[derive(Debug, Clone, Default)]
pub struct CommitmentPatch {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub day_of_month: Option<Option<u8>>,
    pub note: Option<Option<String>>,
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> CommitmentDraft {
        CommitmentDraft {
            title: "Car EMI".into(),
            amount: 10_000.0,
            category: Category::Emi,
            start_date: date(2025, 1, 1),
            end_date: Some(date(2025, 12, 31)),
            day_of_month: Some(5),
            note: None,
        }
    }

    #[test]
    fn draft_validation_catches_bad_fields() {
        let mut d = draft();
        d.title = "   ".into();
        assert!(d.validate().is_err());

        let mut d = draft();
        d.amount = 0.0;
        assert!(d.validate().is_err());

        let mut d = draft();
        d.amount = f64::NAN;
        assert!(d.validate().is_err());

        let mut d = draft();
        d.end_date = Some(date(2024, 12, 31));
        assert!(d.validate().is_err());

        let mut d = draft();
        d.day_of_month = Some(32);
        assert!(d.validate().is_err());

        assert!(draft().validate().is_ok());
    }

    #[test]
    fn from_draft_trims_and_assigns_identity() {
        let mut d = draft();
        d.title = "  Car EMI  ".into();
        d.note = Some("  ".into());
        let a = Commitment::from_draft(d.clone());
        let b = Commitment::from_draft(d);
        assert_eq!(a.title, "Car EMI");
        assert_eq!(a.note, None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut commitment = Commitment::from_draft(draft());
        commitment.apply_patch(CommitmentPatch {
            amount: Some(12_000.0),
            end_date: Some(None),
            ..Default::default()
        });
        assert_eq!(commitment.amount, 12_000.0);
        assert_eq!(commitment.end_date, None);
        assert_eq!(commitment.title, "Car EMI");
        assert_eq!(commitment.category, Category::Emi);
    }

    #[test]
    fn progress_counts_inclusive_months() {
        let commitment = Commitment::from_draft(draft());
        let progress = commitment.progress(date(2025, 6, 15)).unwrap();
        assert_eq!(progress.total, 12);
        assert_eq!(progress.completed, 6);

        let before = commitment.progress(date(2024, 6, 1)).unwrap();
        assert_eq!(before.completed, 0);

        let after = commitment.progress(date(2026, 3, 1)).unwrap();
        assert_eq!(after.completed, 12);
    }

    #[test]
    fn progress_is_none_when_open_ended() {
        let mut d = draft();
        d.end_date = None;
        let commitment = Commitment::from_draft(d);
        assert!(commitment.progress(date(2025, 6, 15)).is_none());
    }

    #[test]
    fn unknown_category_labels_fold_into_other() {
        let parsed: Category = serde_json::from_str("\"INVESTMENT\"").unwrap();
        assert_eq!(parsed, Category::Other);
        let parsed: Category = serde_json::from_str("\"EMI\"").unwrap();
        assert_eq!(parsed, Category::Emi);
    }
}
