#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use cashplan_core::domain::{
    Account, AccountKind, CreditCardStatement, PromotedStatement, RecurrenceRule,
    RecurringCashEvent, SingleShotExpense, StatementRecord,
};
use cashplan_core::errors::{EngineError, Result};
use cashplan_core::progression::StatementStore;
use cashplan_core::time::Clock;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// Clock pinned to a fixed instant so projections and progression checks are
/// reproducible.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn owner() -> Uuid {
    Uuid::new_v4()
}

pub fn checking(balance: i64, updated_at: DateTime<Utc>) -> Account {
    Account::new("Checking", AccountKind::Checking, owner()).with_balance(balance, updated_at)
}

pub fn monthly_event(account: &Account, amount: i64, day: u32) -> RecurringCashEvent {
    RecurringCashEvent::new(
        account.id,
        amount,
        RecurrenceRule::DayOfMonth { day },
        account.owner_id,
    )
}

pub fn one_off(account: &Account, amount: i64, due_on: NaiveDate) -> SingleShotExpense {
    SingleShotExpense::new(account.id, amount, due_on)
}

pub fn statement_with_future(
    payment_account: &Account,
    balance: i64,
    due_day: u32,
    future: i64,
) -> CreditCardStatement {
    CreditCardStatement::new(
        Uuid::new_v4(),
        payment_account.id,
        balance,
        due_day,
        payment_account.owner_id,
    )
    .with_future_balance(future)
}

/// In-memory statement store with per-card failure injection, standing in
/// for the host's persistence layer.
#[derive(Default)]
pub struct MemoryStatementStore {
    pub statements: Mutex<Vec<CreditCardStatement>>,
    pub history: Mutex<Vec<StatementRecord>>,
    pub failing_cards: Mutex<HashSet<Uuid>>,
    /// Every promotion the store accepted, in commit order.
    pub committed: Mutex<Vec<PromotedStatement>>,
}

impl MemoryStatementStore {
    pub fn with_statements(statements: Vec<CreditCardStatement>) -> Self {
        Self {
            statements: Mutex::new(statements),
            ..Self::default()
        }
    }

    pub fn fail_commits_for(&self, card_id: Uuid) {
        self.failing_cards.lock().unwrap().insert(card_id);
    }

    pub fn add_history(&self, record: StatementRecord) {
        self.history.lock().unwrap().push(record);
    }

    pub fn statement_for_card(&self, card_id: Uuid) -> Option<CreditCardStatement> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.card_id == card_id)
            .cloned()
    }
}

impl StatementStore for MemoryStatementStore {
    fn read_future_statements(&self) -> Result<Vec<CreditCardStatement>> {
        Ok(self
            .statements
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.future_balance.is_some())
            .cloned()
            .collect())
    }

    fn commit_promotion(&self, card_id: Uuid, promoted: &PromotedStatement) -> Result<()> {
        if self.failing_cards.lock().unwrap().contains(&card_id) {
            return Err(EngineError::Storage(format!(
                "injected commit failure for card {}",
                card_id
            )));
        }
        let mut statements = self.statements.lock().unwrap();
        let statement = statements
            .iter_mut()
            .find(|s| s.card_id == card_id)
            .ok_or_else(|| EngineError::Storage(format!("no statement for card {}", card_id)))?;
        statement.balance = promoted.balance;
        statement.future_balance = None;
        drop(statements);
        self.committed.lock().unwrap().push(promoted.clone());
        Ok(())
    }

    fn list_history(&self) -> Result<Vec<StatementRecord>> {
        Ok(self.history.lock().unwrap().clone())
    }

    fn delete_stale_statements(&self, ids: &[Uuid]) -> Result<usize> {
        let mut history = self.history.lock().unwrap();
        let before = history.len();
        history.retain(|record| !ids.contains(&record.id));
        Ok(before - history.len())
    }
}
