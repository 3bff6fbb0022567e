//! Month progression: promoting future credit-card statements to current
//! exactly once per real-world month, and pruning stale statement history.
//!
//! The machine is memoryless across invocations; the only durable state is
//! the host-persisted checkpoint timestamp. Each card's promotion is a
//! single store commit, so a card is never observed half-promoted. Re-running
//! after a partial failure is safe: cards whose future slot is already empty
//! are skipped.

pub mod gate;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calendar::has_crossed_month_boundary;
use crate::config::RetentionPolicy;
use crate::domain::{CreditCardStatement, PromotedStatement, StatementRecord};
use crate::errors::{EngineError, Result};
use crate::time::Clock;

pub use gate::{GateGuard, ProgressionGate};

/// External persistence collaborator the progression machine drives.
///
/// Calls are fallible and carry no internal retry; retry policy belongs to
/// the host, which must also guarantee at most one concurrent progression
/// check per owner (see [`ProgressionGate`]).
pub trait StatementStore: Send + Sync {
    /// Statements whose future slot holds a pending balance.
    fn read_future_statements(&self) -> Result<Vec<CreditCardStatement>>;

    /// Atomically replaces the card's current statement with the promoted
    /// state and clears the future slot.
    fn commit_promotion(&self, card_id: Uuid, promoted: &PromotedStatement) -> Result<()>;

    /// All retained statement-history records.
    fn list_history(&self) -> Result<Vec<StatementRecord>>;

    /// Deletes the given history records, returning how many went away.
    fn delete_stale_statements(&self, ids: &[Uuid]) -> Result<usize>;
}

/// Outcome of one progression check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionResult {
    pub success: bool,
    pub progressed_cards: u32,
    pub cleaned_statements: u32,
    pub error: Option<String>,
    /// The timestamp the check ran at. The caller persists this as the new
    /// checkpoint only when `success` is true; on failure the old checkpoint
    /// stays put so the next run retries the same month.
    pub checked_at: DateTime<Utc>,
}

impl ProgressionResult {
    fn no_op(checked_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            progressed_cards: 0,
            cleaned_statements: 0,
            error: None,
            checked_at,
        }
    }
}

/// Drives statement promotion and history cleanup across month boundaries.
pub struct MonthProgression<'a, S: StatementStore> {
    store: &'a S,
    clock: &'a dyn Clock,
    retention: RetentionPolicy,
}

impl<'a, S: StatementStore> MonthProgression<'a, S> {
    pub fn new(store: &'a S, clock: &'a dyn Clock, retention: RetentionPolicy) -> Self {
        Self {
            store,
            clock,
            retention,
        }
    }

    /// Checks whether a month boundary has been crossed since `last_checked`
    /// and, if so, promotes future statements and prunes stale history.
    ///
    /// Safe to call on every app start: inside the same month it is a no-op,
    /// and a retried run only promotes cards that still carry a future
    /// balance.
    pub fn check_and_progress(&self, last_checked: DateTime<Utc>) -> ProgressionResult {
        let now = self.clock.now();
        if !has_crossed_month_boundary(last_checked, now) {
            debug!("no month boundary crossed since {}, nothing to progress", last_checked);
            return ProgressionResult::no_op(now);
        }

        info!(
            "month boundary crossed ({} -> {}), progressing statements",
            last_checked.format("%Y-%m"),
            now.format("%Y-%m")
        );

        let mut progressed_cards = 0u32;
        let mut failures: Vec<String> = Vec::new();

        match self.store.read_future_statements() {
            Ok(statements) => {
                for statement in &statements {
                    match self.promote(statement, now) {
                        Ok(true) => progressed_cards += 1,
                        Ok(false) => {}
                        Err(err) => {
                            warn!("{}", err);
                            failures.push(err.to_string());
                        }
                    }
                }
            }
            Err(err) => failures.push(format!("reading future statements: {}", err)),
        }

        let cleaned_statements = match self.clean_history(now) {
            Ok(count) => count,
            Err(err) => {
                failures.push(format!("cleaning statement history: {}", err));
                0
            }
        };

        if failures.is_empty() {
            info!(
                "progression complete: {} card(s) promoted, {} record(s) cleaned",
                progressed_cards, cleaned_statements
            );
            ProgressionResult {
                success: true,
                progressed_cards,
                cleaned_statements,
                error: None,
                checked_at: now,
            }
        } else {
            ProgressionResult {
                success: false,
                progressed_cards,
                cleaned_statements,
                error: Some(failures.join("; ")),
                checked_at: now,
            }
        }
    }

    /// Promotes one card's future balance into its current statement.
    /// Returns `Ok(false)` when the future slot is already empty, which is
    /// how retried runs skip work already committed.
    fn promote(&self, statement: &CreditCardStatement, now: DateTime<Utc>) -> Result<bool> {
        let promoted = match statement.promoted(now.date_naive()) {
            Some(promoted) => promoted,
            None => return Ok(false),
        };
        self.store
            .commit_promotion(statement.card_id, &promoted)
            .map_err(|err| {
                EngineError::PromotionFailed(format!("card {}: {}", statement.card_id, err))
            })?;
        debug!(
            "card {} promoted: new balance {} due {}",
            statement.card_id, promoted.balance, promoted.due_date
        );
        Ok(true)
    }

    fn clean_history(&self, now: DateTime<Utc>) -> Result<u32> {
        let cutoff = match self.retention.cutoff(now) {
            Some(cutoff) => cutoff,
            None => return Ok(0),
        };
        let stale: Vec<Uuid> = self
            .store
            .list_history()?
            .into_iter()
            .filter(|record| record.closed_at < cutoff)
            .map(|record| record.id)
            .collect();
        if stale.is_empty() {
            return Ok(0);
        }
        let deleted = self.store.delete_stale_statements(&stale)?;
        Ok(deleted as u32)
    }
}
