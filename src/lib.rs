#![doc(test(attr(deny(warnings))))]

//! Cashplan Core provides the cashflow projection and month-progression
//! primitives that power a household cashflow planner: recurring and one-off
//! event expansion, day-by-day balance projection, and the credit-card
//! statement progression that runs once per real-world month.

pub mod calendar;
pub mod config;
pub mod domain;
pub mod errors;
pub mod progression;
pub mod projection;
pub mod schedule;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cashplan Core tracing initialized.");
    });
}
