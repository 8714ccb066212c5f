//! Sale Repository
//!
//! Read-only view over the sales recorded by the ordering side of the
//! platform. The ledger only ever aggregates completed sales per shift
//! window and tenant; nothing here inserts or mutates.

use shared::models::{MethodTotal, PaymentMethod, SaleTotals};

use super::RepoResult;

#[derive(Debug, sqlx::FromRow)]
struct MethodRow {
    payment_method: PaymentMethod,
    count: i64,
    amount: f64,
}

/// Per-method ticket counts and amounts for completed sales in
/// `[start_millis, end_millis)`
pub async fn totals_for_window<'e, E>(
    executor: E,
    business_id: i64,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<SaleTotals>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let rows = sqlx::query_as::<_, MethodRow>(
        "SELECT payment_method, COUNT(*) AS count, COALESCE(SUM(total), 0) AS amount \
         FROM sale \
         WHERE business_id = ? AND status = 'COMPLETED' \
         AND created_at >= ? AND created_at < ? \
         GROUP BY payment_method",
    )
    .bind(business_id)
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(executor)
    .await?;

    let mut totals = SaleTotals::default();
    for row in rows {
        let slot = match row.payment_method {
            PaymentMethod::Cash => &mut totals.cash,
            PaymentMethod::CreditCard => &mut totals.credit_card,
            PaymentMethod::DebitCard => &mut totals.debit_card,
            PaymentMethod::Transfer => &mut totals.transfer,
        };
        *slot = MethodTotal {
            count: row.count,
            amount: row.amount,
        };
    }
    Ok(totals)
}
