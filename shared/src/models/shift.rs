//! Shift Model (caja / register session)

use serde::{Deserialize, Serialize};

use super::movement::Movement;
use super::sale::{MethodTotal, SaleTotals};

/// Shift status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ShiftStatus {
    Open,
    Closed,
}

impl Default for ShiftStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Shift record - one register session from open to close, the unit of
/// cash reconciliation.
///
/// `initial_cash`, the movement log and the per-method totals are frozen
/// the instant the shift transitions to `Closed`; the close transaction is
/// the only writer of the `final_*`, `cash_out` and `difference` fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,

    /// Owning business (tenant boundary - every query is scoped by it)
    pub business_id: i64,

    /// Shift status
    #[serde(default)]
    pub status: ShiftStatus,

    /// Open time (Unix millis)
    pub start_time: i64,

    /// Close time (Unix millis), null while open
    pub end_time: Option<i64>,

    /// Float placed in the drawer at open, immutable afterwards
    pub initial_cash: f64,

    // === Per-method sale totals, written once by close ===
    /// Cash tickets (count)
    #[serde(default)]
    pub cash_sales_count: i64,
    /// Cash tickets (amount) - the only sale total entering the
    /// cash-expectation formula
    #[serde(default)]
    pub cash_sales_amount: f64,
    /// Credit card tickets (count)
    #[serde(default)]
    pub credit_card_count: i64,
    /// Credit card tickets (amount)
    #[serde(default)]
    pub credit_card_amount: f64,
    /// Debit card tickets (count)
    #[serde(default)]
    pub debit_card_count: i64,
    /// Debit card tickets (amount)
    #[serde(default)]
    pub debit_card_amount: f64,
    /// Transfer tickets (count)
    #[serde(default)]
    pub transfer_count: i64,
    /// Transfer tickets (amount)
    #[serde(default)]
    pub transfer_amount: f64,

    /// Expected drawer cash, computed at close:
    /// initial_cash + cash sales + manual ins - manual outs
    pub final_cash_expected: Option<f64>,

    /// Physical count entered by the operator at close
    pub final_cash_actual: Option<f64>,

    /// Amount withdrawn from the drawer at close. Reduces the float carried
    /// into the next shift, never the difference.
    pub cash_out: Option<f64>,

    /// final_cash_actual - final_cash_expected
    /// (positive = overage, negative = shortage)
    pub difference: Option<f64>,

    /// Operator who opened the shift (snapshot)
    pub opened_by_id: i64,
    pub opened_by_name: String,

    /// Operator who performed the close (snapshot)
    pub closed_by_id: Option<i64>,
    pub closed_by_name: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Shift {
    /// The per-method totals snapshot as one value (zeroes while open)
    pub fn sale_totals(&self) -> SaleTotals {
        SaleTotals {
            cash: MethodTotal {
                count: self.cash_sales_count,
                amount: self.cash_sales_amount,
            },
            credit_card: MethodTotal {
                count: self.credit_card_count,
                amount: self.credit_card_amount,
            },
            debit_card: MethodTotal {
                count: self.debit_card_count,
                amount: self.debit_card_amount,
            },
            transfer: MethodTotal {
                count: self.transfer_count,
                amount: self.transfer_amount,
            },
        }
    }
}

/// Open register payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterOpen {
    /// Starting float
    #[serde(default)]
    pub amount: f64,
}

/// Close register payload (corte de caja)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterClose {
    /// Physical cash counted by the operator
    pub final_cash_actual: f64,
    /// Withdrawal taken out of the drawer after counting
    #[serde(default)]
    pub cash_out: f64,
}

/// Register state as seen by the UI
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegisterState {
    Open,
    Closed,
}

/// Snapshot returned by GET /api/finance/current
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterStatus {
    pub status: RegisterState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<Shift>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub movements: Vec<Movement>,
}

/// Finalized shift plus its ordered movement log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDetail {
    pub shift: Shift,
    pub movements: Vec<Movement>,
    /// Gross collected / ticket count; omitted when no tickets were sold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_ticket: Option<f64>,
}

/// Result of the close-then-reopen composition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReopenResult {
    /// The shift that was just finalized
    pub closed: Shift,
    /// The new shift, seeded with final_cash_actual - cash_out
    pub opened: Shift,
}
