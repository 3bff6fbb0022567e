use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Cadence of a recurring cash event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Once per month on the given day, clamped to the month's last day.
    DayOfMonth { day: u32 },
    /// Once per week on the given weekday.
    Weekly { weekday: Weekday },
}

/// A recurring income source or fixed expense.
///
/// Income carries a positive amount, expenses a negative one. The optional
/// bounds restrict which occurrences exist; a rule with no bounds recurs
/// indefinitely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringCashEvent {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Signed amount in minor units: income positive, expense negative.
    pub amount: MinorUnits,
    pub rule: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
    pub owner_id: Uuid,
}

impl RecurringCashEvent {
    pub fn new(account_id: Uuid, amount: MinorUnits, rule: RecurrenceRule, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            rule,
            starts_on: None,
            ends_on: None,
            owner_id,
        }
    }

    /// Restricts the series to dates on or after `date`.
    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.starts_on = Some(date);
        self
    }

    /// Restricts the series to dates on or before `date`.
    pub fn ending(mut self, date: NaiveDate) -> Self {
        self.ends_on = Some(date);
        self
    }
}

impl Identifiable for RecurringCashEvent {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// A one-off planned expense on a specific calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SingleShotExpense {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Positive magnitude; always debited from the target account.
    pub amount: MinorUnits,
    pub due_on: NaiveDate,
}

impl SingleShotExpense {
    pub fn new(account_id: Uuid, amount: MinorUnits, due_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            due_on,
        }
    }
}

impl Identifiable for SingleShotExpense {
    fn id(&self) -> Uuid {
        self.id
    }
}
