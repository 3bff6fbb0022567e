use chrono::{Duration, Utc};
use uuid::Uuid;

use cashplan_core::config::RetentionPolicy;
use cashplan_core::domain::StatementRecord;
use cashplan_core::progression::{MonthProgression, ProgressionGate};

mod common;
use common::{
    checking, date, noon, statement_with_future, FixedClock, MemoryStatementStore,
};

#[test]
fn same_month_check_is_a_no_op() {
    let account = checking(0, noon(2025, 1, 1));
    let statement = statement_with_future(&account, 30_000, 31, 45_000);
    let card_id = statement.card_id;
    let store = MemoryStatementStore::with_statements(vec![statement]);
    let clock = FixedClock(noon(2025, 1, 20));

    let result = MonthProgression::new(&store, &clock, RetentionPolicy::KeepAll)
        .check_and_progress(noon(2025, 1, 5));

    assert!(result.success);
    assert_eq!(result.progressed_cards, 0);
    assert_eq!(result.cleaned_statements, 0);
    assert!(result.error.is_none());
    let untouched = store.statement_for_card(card_id).expect("statement");
    assert_eq!(
        untouched.future_balance,
        Some(45_000),
        "a same-month check must not touch statement state"
    );
}

#[test]
fn crossing_into_february_promotes_and_reclamps_the_due_day() {
    let account = checking(0, noon(2025, 1, 1));
    let statement = statement_with_future(&account, 30_000, 31, 45_000);
    let card_id = statement.card_id;
    let store = MemoryStatementStore::with_statements(vec![statement]);
    let clock = FixedClock(noon(2025, 2, 3));

    let result = MonthProgression::new(&store, &clock, RetentionPolicy::KeepAll)
        .check_and_progress(noon(2025, 1, 15));

    assert!(result.success);
    assert_eq!(result.progressed_cards, 1);
    assert_eq!(result.checked_at, noon(2025, 2, 3));

    let promoted = store.statement_for_card(card_id).expect("statement");
    assert_eq!(promoted.balance, 45_000, "future became current");
    assert_eq!(promoted.future_balance, None, "future slot cleared");

    let commits = store.committed.lock().unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(
        commits[0].due_date,
        date(2025, 2, 28),
        "due day 31 must clamp to non-leap February"
    );
}

#[test]
fn second_check_in_the_new_month_progresses_nothing() {
    let account = checking(0, noon(2025, 1, 1));
    let statement = statement_with_future(&account, 30_000, 31, 45_000);
    let store = MemoryStatementStore::with_statements(vec![statement]);
    let clock = FixedClock(noon(2025, 2, 3));
    let progression = MonthProgression::new(&store, &clock, RetentionPolicy::KeepAll);
    let last_checked = noon(2025, 1, 15);

    let first = progression.check_and_progress(last_checked);
    assert_eq!(first.progressed_cards, 1);

    // The caller failed to persist the checkpoint, so the same last_checked
    // comes back. The card's future slot is empty now, so nothing happens.
    let second = progression.check_and_progress(last_checked);
    assert!(second.success);
    assert_eq!(
        second.progressed_cards, 0,
        "re-checking with no future balance left must be a no-op"
    );
}

#[test]
fn partial_failure_reports_error_and_keeps_completed_promotions() {
    let account = checking(0, noon(2025, 1, 1));
    let healthy = statement_with_future(&account, 10_000, 5, 20_000);
    let broken = statement_with_future(&account, 30_000, 12, 40_000);
    let healthy_card = healthy.card_id;
    let broken_card = broken.card_id;
    let store = MemoryStatementStore::with_statements(vec![healthy, broken]);
    store.fail_commits_for(broken_card);
    let clock = FixedClock(noon(2025, 2, 3));
    let progression = MonthProgression::new(&store, &clock, RetentionPolicy::KeepAll);

    let result = progression.check_and_progress(noon(2025, 1, 15));

    assert!(!result.success, "any failed card fails the invocation");
    assert_eq!(result.progressed_cards, 1, "independent cards still promote");
    let message = result.error.expect("error message");
    assert!(
        message.contains(&broken_card.to_string()),
        "error must name the failing card: {}",
        message
    );

    let promoted = store.statement_for_card(healthy_card).expect("statement");
    assert_eq!(promoted.balance, 20_000);
    assert_eq!(promoted.future_balance, None);

    let stuck = store.statement_for_card(broken_card).expect("statement");
    assert_eq!(
        stuck.future_balance,
        Some(40_000),
        "failed promotion leaves the future slot intact for retry"
    );

    // Host retries the whole check next start; only the stuck card moves.
    store.failing_cards.lock().unwrap().clear();
    let retry = progression.check_and_progress(noon(2025, 1, 15));
    assert!(retry.success);
    assert_eq!(retry.progressed_cards, 1);
    let recovered = store.statement_for_card(broken_card).expect("statement");
    assert_eq!(recovered.balance, 40_000);
    assert_eq!(recovered.future_balance, None);
}

#[test]
fn stale_history_is_cleaned_per_retention_policy() {
    let store = MemoryStatementStore::default();
    let card_id = Uuid::new_v4();
    let now = noon(2025, 2, 3);
    store.add_history(StatementRecord {
        id: Uuid::new_v4(),
        card_id,
        balance: 10_000,
        closed_at: now - Duration::days(120),
    });
    store.add_history(StatementRecord {
        id: Uuid::new_v4(),
        card_id,
        balance: 20_000,
        closed_at: now - Duration::days(10),
    });
    let clock = FixedClock(now);

    let result =
        MonthProgression::new(&store, &clock, RetentionPolicy::MaxAgeDays { days: 60 })
            .check_and_progress(noon(2025, 1, 15));

    assert!(result.success);
    assert_eq!(result.cleaned_statements, 1, "only the 120-day-old record is stale");
    assert_eq!(store.history.lock().unwrap().len(), 1);
}

#[test]
fn keep_all_retention_never_deletes_history() {
    let store = MemoryStatementStore::default();
    let now = noon(2025, 2, 3);
    store.add_history(StatementRecord {
        id: Uuid::new_v4(),
        card_id: Uuid::new_v4(),
        balance: 10_000,
        closed_at: now - Duration::days(3650),
    });
    let clock = FixedClock(now);

    let result = MonthProgression::new(&store, &clock, RetentionPolicy::KeepAll)
        .check_and_progress(noon(2025, 1, 15));

    assert!(result.success);
    assert_eq!(result.cleaned_statements, 0);
    assert_eq!(store.history.lock().unwrap().len(), 1);
}

#[test]
fn checkpoint_timestamp_reflects_the_check_instant() {
    let store = MemoryStatementStore::default();
    let now = Utc::now();
    let clock = FixedClock(now);

    let result = MonthProgression::new(&store, &clock, RetentionPolicy::KeepAll)
        .check_and_progress(now - Duration::days(45));
    assert_eq!(result.checked_at, now);
}

#[test]
fn gate_admits_one_check_per_key_at_a_time() {
    let gate = ProgressionGate::new();
    let group = Uuid::new_v4();
    let other_group = Uuid::new_v4();

    let guard = gate.try_acquire(group).expect("first acquire");
    assert!(
        gate.try_acquire(group).is_none(),
        "second concurrent check for the same group must be refused"
    );
    assert!(
        gate.try_acquire(other_group).is_some(),
        "different groups do not contend"
    );

    drop(guard);
    assert!(
        gate.try_acquire(group).is_some(),
        "dropping the guard releases the key"
    );
}
