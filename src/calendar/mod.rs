//! Pure calendar arithmetic: month-boundary detection and day-of-month
//! clamping. Every day-of-month resolution in the engine goes through
//! [`resolve_day_of_month`] so short months and leap years behave the same
//! everywhere.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// True iff `now` falls in a different (year, month) than `last_checked`.
///
/// Both timestamps are assumed normalized to the same zone by the caller; no
/// timezone conversion happens here.
pub fn has_crossed_month_boundary(last_checked: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (last_checked.year(), last_checked.month()) != (now.year(), now.month())
}

/// Resolves a day-of-month within `year`/`month`, clamping past the month's
/// last valid day: day 31 in a 30-day month resolves to day 30, day 29 in a
/// non-leap February resolves to day 28.
///
/// Caller contract: `1 <= month <= 12` and `day >= 1`.
pub fn resolve_day_of_month(year: i32, month: u32, day: u32) -> NaiveDate {
    let clamped = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, clamped).unwrap()
}

/// Number of days in the given month: the first of the next month minus one.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

/// The (year, month) pair following the given date's month.
pub fn next_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    }
}
