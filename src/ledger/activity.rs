//! Decides whether a commitment counts toward a given reference date.
//!
//! Two containment policies exist. Day-level containment drives the headline
//! "remaining on date" figure; month-level containment is the canonical policy
//! for the monthly breakdown, where a commitment that ends mid-month still
//! counts for its whole ending month.

use chrono::{Datelike, Duration, NaiveDate};

use super::Commitment;

/// The end used for containment checks. Open-ended commitments get a
/// synthetic end one day past the reference, so they are active for any
/// reference at or after their start. Computed into a fresh value; the
/// caller's reference is reused across a whole aggregation pass.
pub fn effective_end(commitment: &Commitment, reference: NaiveDate) -> NaiveDate {
    commitment
        .end_date
        .unwrap_or_else(|| reference + Duration::days(1))
}

/// Day-level containment: `start <= reference <= effective_end`.
pub fn active_on(commitment: &Commitment, reference: NaiveDate) -> bool {
    if reference < commitment.start_date {
        return false;
    }
    if has_inverted_range(commitment) {
        return false;
    }
    reference <= effective_end(commitment, reference)
}

/// Month-level containment: day-level containment, or the reference falling
/// in the same calendar month as the effective end.
pub fn active_in_month(commitment: &Commitment, reference: NaiveDate) -> bool {
    if reference < commitment.start_date {
        return false;
    }
    if has_inverted_range(commitment) {
        return false;
    }
    let end = effective_end(commitment, reference);
    reference <= end || same_month(reference, end)
}

// An end before the start describes an empty schedule. Validation rejects it
// at entry; snapshots predating validation must not resurrect it here.
fn has_inverted_range(commitment: &Commitment) -> bool {
    matches!(commitment.end_date, Some(end) if end < commitment.start_date)
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
