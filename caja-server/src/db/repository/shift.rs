//! Shift Repository
//!
//! Owns the register-session state machine: Closed -> Open -> Closed.
//! Opening is check-then-insert backstopped by the partial unique index;
//! closing is a single transaction that flips the state, re-derives every
//! total from the movement and sales logs, and writes the frozen snapshot.
//! There is no UPDATE path for a CLOSED shift.

use sqlx::SqlitePool;

use shared::models::{RegisterClose, Shift};

use super::{RepoError, RepoResult, movement, sale};
use crate::reconcile;

const SHIFT_COLUMNS: &str = "id, business_id, status, start_time, end_time, initial_cash, \
     cash_sales_count, cash_sales_amount, credit_card_count, credit_card_amount, \
     debit_card_count, debit_card_amount, transfer_count, transfer_amount, \
     final_cash_expected, final_cash_actual, cash_out, difference, \
     opened_by_id, opened_by_name, closed_by_id, closed_by_name, created_at, updated_at";

fn validate_cash_amount(amount: f64, field_name: &str) -> RepoResult<()> {
    if !amount.is_finite() {
        return Err(RepoError::Validation(format!(
            "{field_name} must be a finite number"
        )));
    }
    if amount < 0.0 {
        return Err(RepoError::Validation(format!(
            "{field_name} cannot be negative: {amount}"
        )));
    }
    Ok(())
}

pub async fn find_by_id(
    pool: &SqlitePool,
    business_id: i64,
    id: i64,
) -> RepoResult<Option<Shift>> {
    let shift = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shift WHERE id = ? AND business_id = ?"
    ))
    .bind(id)
    .bind(business_id)
    .fetch_optional(pool)
    .await?;
    Ok(shift)
}

/// The business's currently open shift, if any
pub async fn find_open<'e, E>(executor: E, business_id: i64) -> RepoResult<Option<Shift>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let shift = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shift WHERE business_id = ? AND status = 'OPEN' LIMIT 1"
    ))
    .bind(business_id)
    .fetch_optional(executor)
    .await?;
    Ok(shift)
}

/// Open a new shift seeded with `initial_cash`.
///
/// The pre-check gives a friendly message; under a race the partial unique
/// index rejects the second insert and the sqlx error maps to `Conflict`.
pub async fn open(
    pool: &SqlitePool,
    business_id: i64,
    operator_id: i64,
    operator_name: &str,
    initial_cash: f64,
) -> RepoResult<Shift> {
    validate_cash_amount(initial_cash, "Initial cash")?;

    if find_open(pool, business_id).await?.is_some() {
        return Err(RepoError::Conflict(
            "A register shift is already open for this business".into(),
        ));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO shift (id, business_id, status, start_time, initial_cash, \
         opened_by_id, opened_by_name, created_at, updated_at) \
         VALUES (?, ?, 'OPEN', ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(business_id)
    .bind(now)
    .bind(initial_cash)
    .bind(operator_id)
    .bind(operator_name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, business_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to load shift after insert".into()))
}

/// Close the business's open shift.
///
/// One transaction: the status flip happens first (it takes the write lock
/// and fences concurrent movement appends, which are guarded on
/// status = 'OPEN'), then totals are re-derived from the movement log and
/// the sales window and written alongside. A partial close is never
/// observable.
pub async fn close(
    pool: &SqlitePool,
    business_id: i64,
    operator_id: i64,
    operator_name: &str,
    data: &RegisterClose,
) -> RepoResult<Shift> {
    validate_cash_amount(data.final_cash_actual, "Counted cash")?;
    validate_cash_amount(data.cash_out, "Cash out")?;
    if data.cash_out > data.final_cash_actual {
        return Err(RepoError::Validation(format!(
            "Cash out ({}) cannot exceed counted cash ({})",
            data.cash_out, data.final_cash_actual
        )));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let open = find_open(&mut *tx, business_id)
        .await?
        .ok_or_else(|| RepoError::Conflict("No open register shift".into()))?;

    let rows = sqlx::query(
        "UPDATE shift SET status = 'CLOSED', end_time = ?, final_cash_actual = ?, \
         cash_out = ?, closed_by_id = ?, closed_by_name = ?, updated_at = ? \
         WHERE id = ? AND status = 'OPEN'",
    )
    .bind(now)
    .bind(data.final_cash_actual)
    .bind(data.cash_out)
    .bind(operator_id)
    .bind(operator_name)
    .bind(now)
    .bind(open.id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict("No open register shift".into()));
    }

    let movements = movement::list_for_shift(&mut *tx, open.id).await?;
    let sales = sale::totals_for_window(&mut *tx, business_id, open.start_time, now).await?;

    let balance = reconcile::reconcile(
        open.initial_cash,
        sales.cash.amount,
        &movements,
        data.final_cash_actual,
    );

    sqlx::query(
        "UPDATE shift SET final_cash_expected = ?, difference = ?, \
         cash_sales_count = ?, cash_sales_amount = ?, \
         credit_card_count = ?, credit_card_amount = ?, \
         debit_card_count = ?, debit_card_amount = ?, \
         transfer_count = ?, transfer_amount = ? \
         WHERE id = ?",
    )
    .bind(balance.expected)
    .bind(balance.difference)
    .bind(sales.cash.count)
    .bind(sales.cash.amount)
    .bind(sales.credit_card.count)
    .bind(sales.credit_card.amount)
    .bind(sales.debit_card.count)
    .bind(sales.debit_card.amount)
    .bind(sales.transfer.count)
    .bind(sales.transfer.amount)
    .bind(open.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, business_id, open.id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to load shift after close".into()))
}

/// Finalized shifts for the business, newest first
pub async fn find_closed(
    pool: &SqlitePool,
    business_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Shift>> {
    let shifts = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shift \
         WHERE business_id = ? AND status = 'CLOSED' \
         ORDER BY start_time DESC LIMIT ? OFFSET ?"
    ))
    .bind(business_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(shifts)
}

/// Finalized shifts whose open time falls in `[start_millis, end_millis)`
pub async fn find_closed_in_range(
    pool: &SqlitePool,
    business_id: i64,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<Shift>> {
    let shifts = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shift \
         WHERE business_id = ? AND status = 'CLOSED' \
         AND start_time >= ? AND start_time < ? \
         ORDER BY start_time DESC"
    ))
    .bind(business_id)
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;
    Ok(shifts)
}

/// Open shifts across every business that started before `opened_before`.
/// Read-only; the watchdog logs them for manual settlement.
pub async fn find_stale(pool: &SqlitePool, opened_before: i64) -> RepoResult<Vec<Shift>> {
    let shifts = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shift WHERE status = 'OPEN' AND start_time < ?"
    ))
    .bind(opened_before)
    .fetch_all(pool)
    .await?;
    Ok(shifts)
}
