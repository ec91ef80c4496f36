#![doc(test(attr(deny(warnings))))]

//! Spendtrack keeps a monthly salary and a list of recurring financial
//! commitments (EMIs, savings allocations, other expenses) and answers, for
//! any reference date, how much of the salary remains once the commitments
//! active on that date are taken out, along with a per-category breakdown.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod session;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Spendtrack tracing initialized.");
    });
}
