//! Movement Repository
//!
//! Append-only ledger of manual cash adjustments, scoped to the business's
//! open shift. The insert is a single guarded `INSERT ... SELECT` on
//! status = 'OPEN', so an append serializes against a concurrent close at
//! the storage layer and can never land on a closed shift. Corrections are
//! compensating entries, never edits.

use sqlx::SqlitePool;

use shared::models::{Movement, MovementCreate, MovementKind};

use super::{RepoError, RepoResult};
use crate::utils::validation::MAX_REASON_LEN;

const MOVEMENT_COLUMNS: &str = "id, shift_id, kind, amount, reason, reversal_of, created_at";

fn validate_movement(amount: f64, reason: &str) -> RepoResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(RepoError::Validation(format!(
            "Movement amount must be greater than zero, got {amount}"
        )));
    }
    if reason.trim().is_empty() {
        return Err(RepoError::Validation("Movement reason must not be empty".into()));
    }
    if reason.len() > MAX_REASON_LEN {
        return Err(RepoError::Validation(format!(
            "Movement reason is too long ({} chars, max {MAX_REASON_LEN})",
            reason.len()
        )));
    }
    Ok(())
}

/// Record a manual cash movement against the business's open shift
pub async fn create(
    pool: &SqlitePool,
    business_id: i64,
    data: &MovementCreate,
) -> RepoResult<Movement> {
    validate_movement(data.amount, &data.reason)?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let rows = insert_guarded(
        pool,
        business_id,
        id,
        data.kind,
        data.amount,
        data.reason.trim(),
        None,
        now,
    )
    .await?;

    if rows == 0 {
        return Err(RepoError::Conflict("No open register shift".into()));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to load movement after insert".into()))
}

/// Reverse a movement of the currently open shift by appending the
/// compensating opposite-kind entry. Each movement can be reversed at most
/// once, and reversal entries themselves cannot be reversed.
pub async fn reverse(
    pool: &SqlitePool,
    business_id: i64,
    movement_id: i64,
    reason: Option<&str>,
) -> RepoResult<Movement> {
    let mut tx = pool.begin().await?;

    let open = super::shift::find_open(&mut *tx, business_id)
        .await?
        .ok_or_else(|| RepoError::Conflict("No open register shift".into()))?;

    let original = sqlx::query_as::<_, Movement>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM shift_movement WHERE id = ? AND shift_id = ?"
    ))
    .bind(movement_id)
    .bind(open.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        RepoError::NotFound(format!("Movement {movement_id} not found in the open shift"))
    })?;

    if original.reversal_of.is_some() {
        return Err(RepoError::Validation(
            "A reversal entry cannot itself be reversed".into(),
        ));
    }

    let already: Option<i64> =
        sqlx::query_scalar("SELECT id FROM shift_movement WHERE reversal_of = ?")
            .bind(movement_id)
            .fetch_optional(&mut *tx)
            .await?;
    if already.is_some() {
        return Err(RepoError::Conflict(format!(
            "Movement {movement_id} has already been reversed"
        )));
    }

    let reason = match reason {
        Some(r) if !r.trim().is_empty() => r.trim().to_string(),
        _ => format!("Reversal of movement {}: {}", original.id, original.reason),
    };
    if reason.len() > MAX_REASON_LEN {
        return Err(RepoError::Validation(format!(
            "Movement reason is too long ({} chars, max {MAX_REASON_LEN})",
            reason.len()
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "INSERT INTO shift_movement (id, shift_id, kind, amount, reason, reversal_of, created_at) \
         SELECT ?, id, ?, ?, ?, ?, ? FROM shift WHERE id = ? AND status = 'OPEN'",
    )
    .bind(id)
    .bind(original.kind.opposite())
    .bind(original.amount)
    .bind(&reason)
    .bind(movement_id)
    .bind(now)
    .bind(open.id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(RepoError::Conflict("No open register shift".into()));
    }

    let created = sqlx::query_as::<_, Movement>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM shift_movement WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(created)
}

/// Movement log of one shift, in chronological (insertion) order
pub async fn list_for_shift<'e, E>(executor: E, shift_id: i64) -> RepoResult<Vec<Movement>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let movements = sqlx::query_as::<_, Movement>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM shift_movement \
         WHERE shift_id = ? ORDER BY created_at, id"
    ))
    .bind(shift_id)
    .fetch_all(executor)
    .await?;
    Ok(movements)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Movement>> {
    let movement = sqlx::query_as::<_, Movement>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM shift_movement WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(movement)
}

#[allow(clippy::too_many_arguments)]
async fn insert_guarded(
    pool: &SqlitePool,
    business_id: i64,
    id: i64,
    kind: MovementKind,
    amount: f64,
    reason: &str,
    reversal_of: Option<i64>,
    created_at: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "INSERT INTO shift_movement (id, shift_id, kind, amount, reason, reversal_of, created_at) \
         SELECT ?, id, ?, ?, ?, ?, ? FROM shift WHERE business_id = ? AND status = 'OPEN'",
    )
    .bind(id)
    .bind(kind)
    .bind(amount)
    .bind(reason)
    .bind(reversal_of)
    .bind(created_at)
    .bind(business_id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows)
}
