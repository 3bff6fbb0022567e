//! Expansion of recurring and one-off definitions into dated, signed cash
//! occurrences over a closed date span.
//!
//! Expansion is pure: the same inputs always yield the same sequence, in
//! non-decreasing date order with same-day ties broken by source entity id
//! so downstream aggregation stays deterministic.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{next_month, resolve_day_of_month};
use crate::domain::{MinorUnits, RecurrenceRule, RecurringCashEvent, SingleShotExpense};
use crate::errors::{EngineError, Result};

const MAX_OCCURRENCES: usize = 1024;

/// A closed calendar range: both endpoints are included.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> std::result::Result<Self, DateSpanError> {
        if end < start {
            return Err(DateSpanError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Errors that can occur when constructing [`DateSpan`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DateSpanError {
    #[error("date span end must not precede its start")]
    InvalidRange,
}

/// One dated, signed monetary event targeting an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashOccurrence {
    pub date: NaiveDate,
    pub account_id: Uuid,
    /// Signed amount in minor units; debits are negative.
    pub amount: MinorUnits,
    /// The definition this occurrence came from, used for tie-breaking.
    pub source_id: Uuid,
}

/// Expands a recurring definition into its occurrences inside `span`.
/// Day-of-month rules yield at most one occurrence per covered month, each
/// resolved with day-of-month clamping; weekly rules yield one per matching
/// weekday.
pub fn expand_recurring(
    event: &RecurringCashEvent,
    span: DateSpan,
) -> Result<Vec<CashOccurrence>> {
    let dates = match event.rule {
        RecurrenceRule::DayOfMonth { day } => {
            if day == 0 || day > 31 {
                return Err(EngineError::MalformedRecurrence(format!(
                    "day-of-month {} can never resolve to a valid date",
                    day
                )));
            }
            day_of_month_dates(day, span)
        }
        RecurrenceRule::Weekly { weekday } => weekly_dates(weekday, span),
    };

    Ok(dates
        .into_iter()
        .filter(|date| match event.starts_on {
            Some(start) => *date >= start,
            None => true,
        })
        .filter(|date| match event.ends_on {
            Some(end) => *date <= end,
            None => true,
        })
        .map(|date| CashOccurrence {
            date,
            account_id: event.account_id,
            amount: event.amount,
            source_id: event.id,
        })
        .collect())
}

/// Expands a one-off expense: exactly one debit occurrence if its date falls
/// inside `span`, else none.
pub fn expand_single_shot(expense: &SingleShotExpense, span: DateSpan) -> Option<CashOccurrence> {
    if !span.contains(expense.due_on) {
        return None;
    }
    Some(CashOccurrence {
        date: expense.due_on,
        account_id: expense.account_id,
        amount: -expense.amount,
        source_id: expense.id,
    })
}

/// Expands every definition over `span` and orders the combined sequence by
/// `(date, source_id)`.
pub fn expand_events(
    recurring: &[RecurringCashEvent],
    single_shots: &[SingleShotExpense],
    span: DateSpan,
) -> Result<Vec<CashOccurrence>> {
    let mut occurrences = Vec::new();
    for event in recurring {
        occurrences.extend(expand_recurring(event, span)?);
    }
    for expense in single_shots {
        occurrences.extend(expand_single_shot(expense, span));
    }
    occurrences.sort_by_key(|occ| (occ.date, occ.source_id));
    Ok(occurrences)
}

fn day_of_month_dates(day: u32, span: DateSpan) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut year = span.start.year();
    let mut month = span.start.month();

    while dates.len() < MAX_OCCURRENCES {
        let resolved = resolve_day_of_month(year, month, day);
        if resolved > span.end {
            break;
        }
        if resolved >= span.start {
            dates.push(resolved);
        }
        let (next_year, next) = next_month(resolved);
        year = next_year;
        month = next;
    }

    dates
}

fn weekly_dates(weekday: chrono::Weekday, span: DateSpan) -> Vec<NaiveDate> {
    let offset = (7 + weekday.num_days_from_monday() as i64
        - span.start.weekday().num_days_from_monday() as i64)
        % 7;
    let mut date = span.start + Duration::days(offset);
    let mut dates = Vec::new();
    while date <= span.end && dates.len() < MAX_OCCURRENCES {
        dates.push(date);
        date += Duration::days(7);
    }
    dates
}
