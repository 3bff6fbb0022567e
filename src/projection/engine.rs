//! Day-by-day balance projection.
//!
//! The walk is a pure simulation over the host-supplied entity set: it never
//! mutates statement state. Future statement balances are invisible here and
//! only become current through month progression.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::calendar::next_month;
use crate::domain::{
    Account, CreditCardStatement, MinorUnits, RecurringCashEvent, SingleShotExpense,
};
use crate::errors::{EngineError, Result};
use crate::projection::snapshot::{
    BalanceBasis, DailyBalances, ProjectionSnapshot, SCHEMA_VERSION,
};
use crate::schedule::{expand_events, CashOccurrence, DateSpan};
use crate::time::Clock;

/// The projection horizons the planner offers.
pub const SUPPORTED_HORIZONS: [u16; 5] = [7, 14, 30, 60, 90];

/// Walks account balances from a reference date across a bounded horizon.
pub struct ProjectionEngine<'a> {
    clock: &'a dyn Clock,
}

impl<'a> ProjectionEngine<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self { clock }
    }

    /// Projects per-account balances over `horizon_days`, producing one
    /// entry per day including the reference date itself.
    pub fn project(
        &self,
        accounts: &[Account],
        recurring: &[RecurringCashEvent],
        single_shots: &[SingleShotExpense],
        statements: &[CreditCardStatement],
        horizon_days: u16,
        reference: NaiveDate,
    ) -> Result<ProjectionSnapshot> {
        if !SUPPORTED_HORIZONS.contains(&horizon_days) {
            return Err(EngineError::InvalidHorizon(horizon_days));
        }

        let span = DateSpan {
            start: reference,
            end: reference + Duration::days(horizon_days as i64),
        };
        let occurrences = expand_events(recurring, single_shots, span)?;
        let due_debits = statement_due_debits(statements, span);

        let mut balances: BTreeMap<Uuid, MinorUnits> =
            accounts.iter().map(|a| (a.id, a.balance)).collect();
        let basis = balance_basis(accounts, reference);

        debug!(
            "projecting {} day(s) across {} occurrence(s) and {} statement debit(s)",
            horizon_days,
            occurrences.len(),
            due_debits.len()
        );

        let mut days = Vec::with_capacity(horizon_days as usize + 1);
        let mut pending = occurrences.as_slice();
        for offset in 0..=horizon_days {
            let date = reference + Duration::days(offset as i64);

            let applicable = take_due(&mut pending, date);
            for occ in applicable {
                apply(&mut balances, occ.account_id, occ.amount, "event", occ.source_id);
            }
            for (due_date, statement) in &due_debits {
                if *due_date == date {
                    apply(
                        &mut balances,
                        statement.payment_account_id,
                        -statement.balance,
                        "statement",
                        statement.id,
                    );
                }
            }

            let total = balances.values().sum();
            days.push(DailyBalances {
                date,
                balances: balances.clone(),
                total,
            });
        }

        Ok(ProjectionSnapshot {
            schema_version: SCHEMA_VERSION,
            generated_at: self.clock.now(),
            horizon_days,
            days,
            basis,
        })
    }
}

// Occurrences arrive sorted, so one forward scan covers the whole walk.
fn take_due<'s>(pending: &mut &'s [CashOccurrence], date: NaiveDate) -> &'s [CashOccurrence] {
    let split = pending
        .iter()
        .position(|occ| occ.date > date)
        .unwrap_or(pending.len());
    let (due, rest) = pending.split_at(split);
    *pending = rest;
    due
}

fn apply(
    balances: &mut BTreeMap<Uuid, MinorUnits>,
    account_id: Uuid,
    amount: MinorUnits,
    source_kind: &str,
    source_id: Uuid,
) {
    match balances.get_mut(&account_id) {
        Some(balance) => *balance += amount,
        None => warn!(
            "{} {} targets unknown account {}, skipping",
            source_kind, source_id, account_id
        ),
    }
}

/// Computes the date-or-range descriptor for how fresh the starting
/// balances are. An empty account set degenerates to the reference date.
fn balance_basis(accounts: &[Account], reference: NaiveDate) -> BalanceBasis {
    let mut dates: Vec<NaiveDate> = accounts
        .iter()
        .map(|a| a.last_updated_at.date_naive())
        .collect();
    dates.sort();
    dates.dedup();
    match (dates.first(), dates.last()) {
        (Some(&first), Some(&last)) if first == last => BalanceBasis::Single { date: first },
        (Some(&first), Some(&last)) => BalanceBasis::Range {
            from: first,
            to: last,
        },
        _ => BalanceBasis::Single { date: reference },
    }
}

/// Resolves, per statement, the single due date its current balance is
/// debited on: the first clamped due day on or after the span start. The
/// future balance never enters the walk; promotion owns it.
fn statement_due_debits(
    statements: &[CreditCardStatement],
    span: DateSpan,
) -> Vec<(NaiveDate, CreditCardStatement)> {
    let mut debits = Vec::new();
    for statement in statements {
        let mut year = span.start.year();
        let mut month = span.start.month();
        let mut resolved = statement.due_date_in(year, month);
        if resolved < span.start {
            let (y, m) = next_month(resolved);
            year = y;
            month = m;
            resolved = statement.due_date_in(year, month);
        }
        if span.contains(resolved) {
            debits.push((resolved, statement.clone()));
        }
    }
    debits
}
