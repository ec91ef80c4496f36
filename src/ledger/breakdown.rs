//! Aggregates the commitments active for a reference date into per-category
//! totals, a remaining-balance figure, and percentage shares.

use chrono::NaiveDate;
use uuid::Uuid;

use super::{activity, Category, Ledger};

/// Sum of active amounts per category. All three categories are always
/// present, zero-filled when nothing falls into them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryTotals {
    pub emi: f64,
    pub saving: f64,
    pub other: f64,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Emi => self.emi,
            Category::Saving => self.saving,
            Category::Other => self.other,
        }
    }

    pub fn total(&self) -> f64 {
        self.emi + self.saving + self.other
    }

    pub fn entries(&self) -> [(Category, f64); 3] {
        [
            (Category::Emi, self.emi),
            (Category::Saving, self.saving),
            (Category::Other, self.other),
        ]
    }

    fn add(&mut self, category: Category, amount: f64) {
        match category {
            Category::Emi => self.emi += amount,
            Category::Saving => self.saving += amount,
            Category::Other => self.other += amount,
        }
    }
}

/// A labelled wedge of the breakdown chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: &'static str,
    pub amount: f64,
    pub percent: i64,
}

/// Evaluation result for one reference date. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub reference: NaiveDate,
    pub salary_monthly: f64,
    pub active_ids: Vec<Uuid>,
    pub totals: CategoryTotals,
    pub total_spent: f64,
    /// Signed; negative means overspend and is surfaced as such.
    pub remaining_balance: f64,
    /// Floored at zero, used only for the visual breakdown.
    pub remaining_for_chart: f64,
}

/// Full pass over the ledger: filters with month-level containment, sums per
/// category, derives the remaining figures. O(n) every call; the ledger holds
/// tens of commitments, not millions.
pub fn evaluate(ledger: &Ledger, reference: NaiveDate) -> Breakdown {
    let salary = ledger.salary_monthly;
    let mut totals = CategoryTotals::default();
    let mut active_ids = Vec::new();

    for commitment in &ledger.commitments {
        if !activity::active_in_month(commitment, reference) {
            continue;
        }
        active_ids.push(commitment.id);
        totals.add(commitment.category, commitment.sanitized_amount());
    }

    let total_spent = totals.total();
    Breakdown {
        reference,
        salary_monthly: salary,
        active_ids,
        totals,
        total_spent,
        remaining_balance: salary - total_spent,
        remaining_for_chart: (salary - total_spent).max(0.0),
    }
}

impl Breakdown {
    pub fn has_active(&self) -> bool {
        !self.active_ids.is_empty()
    }

    pub fn is_overspent(&self) -> bool {
        self.remaining_balance < 0.0
    }

    /// Denominator for percentage shares: the salary when set, otherwise the
    /// spend total, otherwise 1. Division by zero is impossible by
    /// construction.
    pub fn percent_base(&self) -> f64 {
        if self.salary_monthly > 0.0 {
            self.salary_monthly
        } else if self.total_spent > 0.0 {
            self.total_spent
        } else {
            1.0
        }
    }

    pub fn percent_of(&self, value: f64) -> i64 {
        (100.0 * value / self.percent_base()).round() as i64
    }

    /// Chart wedges: non-zero category totals plus the floored remaining
    /// share. Empty when nothing is active, so callers render an empty state
    /// instead of 0% wedges.
    pub fn slices(&self) -> Vec<Slice> {
        if !self.has_active() {
            return Vec::new();
        }
        let mut slices: Vec<Slice> = self
            .totals
            .entries()
            .into_iter()
            .filter(|(_, amount)| *amount > 0.0)
            .map(|(category, amount)| Slice {
                label: category.label(),
                amount,
                percent: self.percent_of(amount),
            })
            .collect();
        if self.remaining_for_chart > 0.0 {
            slices.push(Slice {
                label: "REMAINING",
                amount: self.remaining_for_chart,
                percent: self.percent_of(self.remaining_for_chart),
            });
        }
        slices
    }
}
