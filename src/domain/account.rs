use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Represents a cash account tracked by the planner.
///
/// Accounts are created and edited by the user; the engine only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    /// Current balance in minor currency units.
    pub balance: MinorUnits,
    /// When the user last confirmed the real-world balance.
    pub last_updated_at: DateTime<Utc>,
    pub owner_id: Uuid,
}

impl Account {
    /// Creates a new account owned by `owner_id` with a zero balance.
    pub fn new(name: impl Into<String>, kind: AccountKind, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            balance: 0,
            last_updated_at: Utc::now(),
            owner_id,
        }
    }

    /// Sets the current balance and the timestamp it was confirmed at.
    pub fn with_balance(mut self, balance: MinorUnits, updated_at: DateTime<Utc>) -> Self {
        self.balance = balance;
        self.last_updated_at = updated_at;
        self
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Enumerates the supported account classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Investment,
}
