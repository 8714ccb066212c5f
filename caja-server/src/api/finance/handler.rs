//! Finance API Handlers (register shift ledger)

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{movement, shift};
use crate::utils::validation::{MAX_REASON_LEN, validate_cash, validate_positive_cash, validate_required_text};
use crate::utils::{AppError, AppResult, time};
use shared::models::{
    Movement, MovementCreate, MovementReverse, RegisterClose, RegisterOpen, RegisterState,
    RegisterStatus, ReopenResult, Shift, ShiftDetail,
};

/// Query params for listing finalized shifts
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/finance/current - register snapshot for the tenant
pub async fn get_current(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<RegisterStatus>> {
    let open = shift::find_open(&state.pool, current_user.business_id).await?;

    let status = match open {
        Some(s) => {
            let movements = movement::list_for_shift(&state.pool, s.id).await?;
            RegisterStatus {
                status: RegisterState::Open,
                shift: Some(s),
                movements,
            }
        }
        None => RegisterStatus {
            status: RegisterState::Closed,
            shift: None,
            movements: vec![],
        },
    };

    Ok(Json(status))
}

/// POST /api/finance/open - open a shift with the starting float
pub async fn open(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RegisterOpen>,
) -> AppResult<Json<Shift>> {
    validate_cash(payload.amount, "amount")?;

    let s = shift::open(
        &state.pool,
        current_user.business_id,
        current_user.id,
        &current_user.username,
        payload.amount,
    )
    .await?;

    tracing::info!(
        business_id = current_user.business_id,
        shift_id = s.id,
        initial_cash = s.initial_cash,
        operator = %current_user.username,
        "Register shift opened"
    );

    Ok(Json(s))
}

/// POST /api/finance/movement - record a manual cash in/out
pub async fn post_movement(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<MovementCreate>,
) -> AppResult<Json<Movement>> {
    validate_positive_cash(payload.amount, "amount")?;
    validate_required_text(&payload.reason, "reason", MAX_REASON_LEN)?;

    let m = movement::create(&state.pool, current_user.business_id, &payload).await?;

    tracing::info!(
        business_id = current_user.business_id,
        shift_id = m.shift_id,
        movement_id = m.id,
        kind = ?m.kind,
        amount = m.amount,
        "Cash movement recorded"
    );

    Ok(Json(m))
}

/// POST /api/finance/movement/{id}/reverse - compensating entry
pub async fn reverse_movement(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<MovementReverse>,
) -> AppResult<Json<Movement>> {
    let m = movement::reverse(
        &state.pool,
        current_user.business_id,
        id,
        payload.reason.as_deref(),
    )
    .await?;

    tracing::info!(
        business_id = current_user.business_id,
        shift_id = m.shift_id,
        movement_id = m.id,
        reversal_of = id,
        "Cash movement reversed"
    );

    Ok(Json(m))
}

/// POST /api/finance/close - corte de caja
pub async fn close(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RegisterClose>,
) -> AppResult<Json<Shift>> {
    validate_cash(payload.final_cash_actual, "final_cash_actual")?;
    validate_cash(payload.cash_out, "cash_out")?;

    let s = shift::close(
        &state.pool,
        current_user.business_id,
        current_user.id,
        &current_user.username,
        &payload,
    )
    .await?;

    tracing::info!(
        business_id = current_user.business_id,
        shift_id = s.id,
        expected = s.final_cash_expected,
        counted = s.final_cash_actual,
        difference = s.difference,
        operator = %current_user.username,
        "Register shift closed"
    );

    Ok(Json(s))
}

/// POST /api/finance/reopen - close, then open the next shift with the
/// leftover float (`final_cash_actual - cash_out`).
///
/// Composition of the two primitives: if the open step fails, the close
/// stays committed and the caller re-queries `/current`.
pub async fn reopen(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RegisterClose>,
) -> AppResult<Json<ReopenResult>> {
    validate_cash(payload.final_cash_actual, "final_cash_actual")?;
    validate_cash(payload.cash_out, "cash_out")?;

    let closed = shift::close(
        &state.pool,
        current_user.business_id,
        current_user.id,
        &current_user.username,
        &payload,
    )
    .await?;

    let float = payload.final_cash_actual - payload.cash_out;
    let opened = shift::open(
        &state.pool,
        current_user.business_id,
        current_user.id,
        &current_user.username,
        float,
    )
    .await?;

    tracing::info!(
        business_id = current_user.business_id,
        closed_shift_id = closed.id,
        opened_shift_id = opened.id,
        carried_float = float,
        "Register shift closed and reopened"
    );

    Ok(Json(ReopenResult { closed, opened }))
}

/// GET /api/finance/history - finalized shifts for the tenant
pub async fn history(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Shift>>> {
    let tz = state.config.timezone;
    let shifts = if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        let start_date = time::parse_date(&start)?;
        let end_date = time::parse_date(&end)?;
        shift::find_closed_in_range(
            &state.pool,
            current_user.business_id,
            time::day_start_millis(start_date, tz),
            time::day_end_millis(end_date, tz),
        )
        .await
    } else {
        shift::find_closed(&state.pool, current_user.business_id, query.limit, query.offset).await
    }?;

    Ok(Json(shifts))
}

/// GET /api/finance/history/{id} - one shift plus its movement log
pub async fn get_shift(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ShiftDetail>> {
    let shift = shift::find_by_id(&state.pool, current_user.business_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shift {} not found", id)))?;

    let movements = movement::list_for_shift(&state.pool, shift.id).await?;
    let average_ticket = crate::reconcile::average_ticket(&shift.sale_totals());

    Ok(Json(ShiftDetail {
        shift,
        movements,
        average_ticket,
    }))
}
