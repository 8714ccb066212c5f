//! Register shift lifecycle tests
//!
//! Exercise the repositories and the reconciliation engine together against
//! an in-memory database: open/close flows, movement ledger, reversal,
//! tenant isolation and the cash-expectation math.

use sqlx::SqlitePool;

use caja_server::db;
use caja_server::db::repository::{RepoError, movement, sale, shift};
use shared::models::{MovementCreate, MovementKind, RegisterClose, ShiftStatus};

const BUSINESS_A: i64 = 1001;
const BUSINESS_B: i64 = 1002;
const OPERATOR_ID: i64 = 7;
const OPERATOR_NAME: &str = "Lupita";

async fn test_pool() -> SqlitePool {
    db::connect_in_memory().await.expect("in-memory database")
}

async fn seed_sale(pool: &SqlitePool, business_id: i64, total: f64, method: &str, status: &str) {
    sqlx::query(
        "INSERT INTO sale (id, business_id, total, payment_method, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(shared::util::snowflake_id())
    .bind(business_id)
    .bind(total)
    .bind(method)
    .bind(status)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await
    .expect("seed sale");
}

fn movement_payload(kind: MovementKind, amount: f64, reason: &str) -> MovementCreate {
    MovementCreate {
        kind,
        amount,
        reason: reason.to_string(),
    }
}

fn close_payload(final_cash_actual: f64, cash_out: f64) -> RegisterClose {
    RegisterClose {
        final_cash_actual,
        cash_out,
    }
}

/// Sales are attributed to the half-open window [start_time, close_time),
/// so let the millisecond clock tick past the last seeded sale.
async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
}

// ========================================================================
// Open
// ========================================================================

#[tokio::test]
async fn open_creates_an_open_shift_with_the_float() {
    let pool = test_pool().await;

    let s = shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 500.0)
        .await
        .unwrap();

    assert_eq!(s.status, ShiftStatus::Open);
    assert_eq!(s.initial_cash, 500.0);
    assert_eq!(s.business_id, BUSINESS_A);
    assert!(s.end_time.is_none());
    assert!(s.final_cash_expected.is_none());
    assert_eq!(s.opened_by_name, OPERATOR_NAME);

    let current = shift::find_open(&pool, BUSINESS_A).await.unwrap();
    assert_eq!(current.unwrap().id, s.id);
}

#[tokio::test]
async fn double_open_is_rejected_and_leaves_the_first_untouched() {
    let pool = test_pool().await;

    let first = shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 300.0)
        .await
        .unwrap();

    let err = shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 100.0)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let still_open = shift::find_open(&pool, BUSINESS_A).await.unwrap().unwrap();
    assert_eq!(still_open.id, first.id);
    assert_eq!(still_open.initial_cash, 300.0);
    assert_eq!(still_open.status, ShiftStatus::Open);
}

#[tokio::test]
async fn open_rejects_negative_float() {
    let pool = test_pool().await;

    let err = shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, -50.0)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn each_business_gets_its_own_open_shift() {
    let pool = test_pool().await;

    let a = shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 100.0)
        .await
        .unwrap();
    let b = shift::open(&pool, BUSINESS_B, OPERATOR_ID, OPERATOR_NAME, 200.0)
        .await
        .unwrap();

    assert_ne!(a.id, b.id);
    // Tenant scoping: A's shift is invisible through B's scope
    assert!(shift::find_by_id(&pool, BUSINESS_B, a.id).await.unwrap().is_none());
    assert!(shift::find_by_id(&pool, BUSINESS_A, a.id).await.unwrap().is_some());
}

// ========================================================================
// Movements
// ========================================================================

#[tokio::test]
async fn movements_append_to_the_open_shift_in_order() {
    let pool = test_pool().await;

    let s = shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 1000.0)
        .await
        .unwrap();

    let m1 = movement::create(
        &pool,
        BUSINESS_A,
        &movement_payload(MovementKind::In, 200.0, "loan"),
    )
    .await
    .unwrap();
    let m2 = movement::create(
        &pool,
        BUSINESS_A,
        &movement_payload(MovementKind::Out, 50.0, "supplies"),
    )
    .await
    .unwrap();

    assert_eq!(m1.shift_id, s.id);
    assert_eq!(m2.shift_id, s.id);

    let log = movement::list_for_shift(&pool, s.id).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].id, m1.id);
    assert_eq!(log[1].id, m2.id);
}

#[tokio::test]
async fn movement_without_open_shift_is_a_conflict() {
    let pool = test_pool().await;

    let err = movement::create(
        &pool,
        BUSINESS_A,
        &movement_payload(MovementKind::In, 10.0, "float top-up"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[tokio::test]
async fn movement_validation_rejects_bad_input() {
    let pool = test_pool().await;
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 100.0)
        .await
        .unwrap();

    for payload in [
        movement_payload(MovementKind::In, 0.0, "zero"),
        movement_payload(MovementKind::In, -25.0, "negative"),
        movement_payload(MovementKind::Out, f64::NAN, "nan"),
        movement_payload(MovementKind::In, 10.0, "   "),
    ] {
        let err = movement::create(&pool, BUSINESS_A, &payload).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)), "payload: {payload:?}");
    }
}

#[tokio::test]
async fn reverse_appends_a_compensating_entry_once() {
    let pool = test_pool().await;
    let s = shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 400.0)
        .await
        .unwrap();

    let original = movement::create(
        &pool,
        BUSINESS_A,
        &movement_payload(MovementKind::In, 60.0, "typo entry"),
    )
    .await
    .unwrap();

    let reversal = movement::reverse(&pool, BUSINESS_A, original.id, None)
        .await
        .unwrap();
    assert_eq!(reversal.kind, MovementKind::Out);
    assert_eq!(reversal.amount, 60.0);
    assert_eq!(reversal.reversal_of, Some(original.id));

    // Second reversal of the same movement is rejected
    let err = movement::reverse(&pool, BUSINESS_A, original.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // A reversal entry cannot itself be reversed
    let err = movement::reverse(&pool, BUSINESS_A, reversal.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // The pair nets out: closing with the plain float shows no difference
    let closed = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(400.0, 0.0),
    )
    .await
    .unwrap();
    assert_eq!(closed.id, s.id);
    assert_eq!(closed.final_cash_expected, Some(400.0));
    assert_eq!(closed.difference, Some(0.0));
}

// ========================================================================
// Close / reconciliation
// ========================================================================

#[tokio::test]
async fn empty_shift_reconciles_to_the_float() {
    let pool = test_pool().await;
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 500.0)
        .await
        .unwrap();

    let closed = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(500.0, 0.0),
    )
    .await
    .unwrap();

    assert_eq!(closed.status, ShiftStatus::Closed);
    assert_eq!(closed.final_cash_expected, Some(500.0));
    assert_eq!(closed.final_cash_actual, Some(500.0));
    assert_eq!(closed.difference, Some(0.0));
    assert!(closed.end_time.is_some());
    assert_eq!(closed.closed_by_name.as_deref(), Some(OPERATOR_NAME));
}

#[tokio::test]
async fn manual_movements_enter_the_expectation() {
    let pool = test_pool().await;
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 1000.0)
        .await
        .unwrap();

    movement::create(
        &pool,
        BUSINESS_A,
        &movement_payload(MovementKind::In, 200.0, "loan"),
    )
    .await
    .unwrap();
    movement::create(
        &pool,
        BUSINESS_A,
        &movement_payload(MovementKind::Out, 50.0, "supplies"),
    )
    .await
    .unwrap();

    let closed = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(1150.0, 0.0),
    )
    .await
    .unwrap();

    assert_eq!(closed.final_cash_expected, Some(1150.0));
    assert_eq!(closed.difference, Some(0.0));
}

#[tokio::test]
async fn cash_sales_in_the_window_enter_the_expectation() {
    let pool = test_pool().await;
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 300.0)
        .await
        .unwrap();

    seed_sale(&pool, BUSINESS_A, 250.0, "CASH", "COMPLETED").await;
    seed_sale(&pool, BUSINESS_A, 170.0, "CASH", "COMPLETED").await;
    // Excluded: voided, other tenant
    seed_sale(&pool, BUSINESS_A, 999.0, "CASH", "VOID").await;
    seed_sale(&pool, BUSINESS_B, 888.0, "CASH", "COMPLETED").await;
    tick().await;

    let closed = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(720.0, 0.0),
    )
    .await
    .unwrap();

    assert_eq!(closed.cash_sales_count, 2);
    assert_eq!(closed.cash_sales_amount, 420.0);
    assert_eq!(closed.final_cash_expected, Some(720.0));
    assert_eq!(closed.difference, Some(0.0));
}

#[tokio::test]
async fn shortage_shows_as_negative_difference() {
    let pool = test_pool().await;
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 300.0)
        .await
        .unwrap();

    seed_sale(&pool, BUSINESS_A, 420.0, "CASH", "COMPLETED").await;
    tick().await;

    let closed = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(700.0, 0.0),
    )
    .await
    .unwrap();

    assert_eq!(closed.final_cash_expected, Some(720.0));
    assert_eq!(closed.difference, Some(-20.0));
}

#[tokio::test]
async fn card_and_transfer_sales_are_reported_but_stay_out_of_the_drawer() {
    let pool = test_pool().await;
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 100.0)
        .await
        .unwrap();

    seed_sale(&pool, BUSINESS_A, 80.0, "CREDIT_CARD", "COMPLETED").await;
    seed_sale(&pool, BUSINESS_A, 45.0, "DEBIT_CARD", "COMPLETED").await;
    seed_sale(&pool, BUSINESS_A, 45.0, "DEBIT_CARD", "COMPLETED").await;
    seed_sale(&pool, BUSINESS_A, 120.0, "TRANSFER", "COMPLETED").await;
    tick().await;

    let closed = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(100.0, 0.0),
    )
    .await
    .unwrap();

    // Reported per method...
    assert_eq!(closed.credit_card_count, 1);
    assert_eq!(closed.credit_card_amount, 80.0);
    assert_eq!(closed.debit_card_count, 2);
    assert_eq!(closed.debit_card_amount, 90.0);
    assert_eq!(closed.transfer_count, 1);
    assert_eq!(closed.transfer_amount, 120.0);
    // ...but the drawer expectation is float-only
    assert_eq!(closed.final_cash_expected, Some(100.0));
    assert_eq!(closed.difference, Some(0.0));
}

#[tokio::test]
async fn close_without_open_shift_is_a_conflict() {
    let pool = test_pool().await;

    let err = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(0.0, 0.0),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[tokio::test]
async fn cash_out_cannot_exceed_the_counted_cash() {
    let pool = test_pool().await;
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 100.0)
        .await
        .unwrap();

    let err = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(100.0, 150.0),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // The shift is still open after the rejected close
    assert!(shift::find_open(&pool, BUSINESS_A).await.unwrap().is_some());
}

#[tokio::test]
async fn closed_shifts_are_immutable() {
    let pool = test_pool().await;
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 500.0)
        .await
        .unwrap();
    movement::create(
        &pool,
        BUSINESS_A,
        &movement_payload(MovementKind::In, 40.0, "change float"),
    )
    .await
    .unwrap();

    let closed = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(540.0, 0.0),
    )
    .await
    .unwrap();

    // Closing again, or posting against the closed shift, is a conflict
    let err = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(0.0, 0.0),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let err = movement::create(
        &pool,
        BUSINESS_A,
        &movement_payload(MovementKind::Out, 10.0, "late expense"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // Stored figures are unchanged
    let reread = shift::find_by_id(&pool, BUSINESS_A, closed.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reread.status, ShiftStatus::Closed);
    assert_eq!(reread.final_cash_expected, closed.final_cash_expected);
    assert_eq!(reread.final_cash_actual, closed.final_cash_actual);
    assert_eq!(reread.difference, closed.difference);
    assert_eq!(reread.end_time, closed.end_time);

    let log = movement::list_for_shift(&pool, closed.id).await.unwrap();
    assert_eq!(log.len(), 1);
}

// ========================================================================
// Reopen / history
// ========================================================================

#[tokio::test]
async fn reopen_carries_the_leftover_float_forward() {
    let pool = test_pool().await;
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 500.0)
        .await
        .unwrap();

    let closed = shift::close(
        &pool,
        BUSINESS_A,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(800.0, 300.0),
    )
    .await
    .unwrap();

    // cash_out reduces the next float, never the difference
    assert_eq!(closed.difference, Some(800.0 - closed.final_cash_expected.unwrap()));
    assert_eq!(closed.cash_out, Some(300.0));

    let float = closed.final_cash_actual.unwrap() - closed.cash_out.unwrap();
    let next = shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, float)
        .await
        .unwrap();
    assert_eq!(next.initial_cash, 500.0);
}

#[tokio::test]
async fn history_lists_finalized_shifts_newest_first() {
    let pool = test_pool().await;

    for counted in [100.0, 200.0] {
        shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, counted)
            .await
            .unwrap();
        shift::close(
            &pool,
            BUSINESS_A,
            OPERATOR_ID,
            OPERATOR_NAME,
            &close_payload(counted, 0.0),
        )
        .await
        .unwrap();
    }
    // A still-open shift never shows up in history
    shift::open(&pool, BUSINESS_A, OPERATOR_ID, OPERATOR_NAME, 300.0)
        .await
        .unwrap();
    // Other tenants' history is invisible
    shift::open(&pool, BUSINESS_B, OPERATOR_ID, OPERATOR_NAME, 50.0)
        .await
        .unwrap();
    shift::close(
        &pool,
        BUSINESS_B,
        OPERATOR_ID,
        OPERATOR_NAME,
        &close_payload(50.0, 0.0),
    )
    .await
    .unwrap();

    let history = shift::find_closed(&pool, BUSINESS_A, 50, 0).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].start_time >= history[1].start_time);
    assert!(history.iter().all(|s| s.status == ShiftStatus::Closed));
    assert!(history.iter().all(|s| s.business_id == BUSINESS_A));
}

// ========================================================================
// Sales aggregation
// ========================================================================

#[tokio::test]
async fn sale_totals_are_scoped_by_window_and_tenant() {
    let pool = test_pool().await;
    let now = shared::util::now_millis();

    seed_sale(&pool, BUSINESS_A, 100.0, "CASH", "COMPLETED").await;
    seed_sale(&pool, BUSINESS_A, 60.0, "CREDIT_CARD", "COMPLETED").await;
    seed_sale(&pool, BUSINESS_B, 40.0, "CASH", "COMPLETED").await;

    let totals = sale::totals_for_window(&pool, BUSINESS_A, now - 60_000, now + 60_000)
        .await
        .unwrap();
    assert_eq!(totals.cash.count, 1);
    assert_eq!(totals.cash.amount, 100.0);
    assert_eq!(totals.credit_card.count, 1);
    assert_eq!(totals.credit_card.amount, 60.0);
    assert_eq!(totals.ticket_count(), 2);
    assert_eq!(totals.gross_amount(), 160.0);

    // Outside the window: nothing
    let empty = sale::totals_for_window(&pool, BUSINESS_A, now - 120_000, now - 60_000)
        .await
        .unwrap();
    assert_eq!(empty.ticket_count(), 0);
}
