use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::resolve_day_of_month;
use crate::domain::common::*;

/// A credit card's statement state: the balance currently due plus the
/// optional balance accruing for the next billing cycle.
///
/// At most one statement per card is current at any time, and the future
/// slot holds at most one pending balance. The future balance only becomes
/// current through month progression, never through projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditCardStatement {
    pub id: Uuid,
    /// The credit card this statement belongs to.
    pub card_id: Uuid,
    /// The cash account the due-day payment is drawn from.
    pub payment_account_id: Uuid,
    /// Amount due this cycle, in minor units.
    pub balance: MinorUnits,
    /// Configured day of month the payment is due; resolved per month with
    /// day-of-month clamping.
    pub due_day: u32,
    /// Charges accrued for the next cycle, not yet due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_balance: Option<MinorUnits>,
    pub owner_id: Uuid,
}

impl CreditCardStatement {
    pub fn new(
        card_id: Uuid,
        payment_account_id: Uuid,
        balance: MinorUnits,
        due_day: u32,
        owner_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            payment_account_id,
            balance,
            due_day,
            future_balance: None,
            owner_id,
        }
    }

    /// Records charges accruing toward the next cycle.
    pub fn with_future_balance(mut self, balance: MinorUnits) -> Self {
        self.future_balance = Some(balance);
        self
    }

    /// The concrete due date for this statement inside the given month.
    pub fn due_date_in(&self, year: i32, month: u32) -> NaiveDate {
        resolve_day_of_month(year, month, self.due_day)
    }

    /// Builds the statement state resulting from promoting the future
    /// balance at a month boundary, or `None` when there is nothing to
    /// promote. `cycle` is any date inside the new billing month.
    pub fn promoted(&self, cycle: NaiveDate) -> Option<PromotedStatement> {
        use chrono::Datelike;

        let future = self.future_balance?;
        Some(PromotedStatement {
            statement_id: self.id,
            balance: future,
            due_date: resolve_day_of_month(cycle.year(), cycle.month(), self.due_day),
        })
    }
}

impl Identifiable for CreditCardStatement {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// The new current-statement state a promotion commits: the former future
/// balance plus the due date resolved for the new cycle. The future slot is
/// cleared by the same commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromotedStatement {
    pub statement_id: Uuid,
    pub balance: MinorUnits,
    pub due_date: NaiveDate,
}

/// A retained historical statement, subject to retention cleanup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementRecord {
    pub id: Uuid,
    pub card_id: Uuid,
    pub balance: MinorUnits,
    /// When the cycle this record describes was closed out.
    pub closed_at: DateTime<Utc>,
}

impl Identifiable for StatementRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}
