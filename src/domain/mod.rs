pub mod account;
pub mod common;
pub mod event;
pub mod statement;

pub use account::{Account, AccountKind};
pub use common::{Identifiable, MinorUnits};
pub use event::{RecurrenceRule, RecurringCashEvent, SingleShotExpense};
pub use statement::{CreditCardStatement, PromotedStatement, StatementRecord};
