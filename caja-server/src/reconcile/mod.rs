//! Reconciliation Engine
//!
//! Pure functions over a closing shift's data. Expected cash is derived
//! transactionally from the immutable movement log and the sales log
//! (float + cash sales + manual ins - manual outs) instead of trusting any
//! running counter, so the figure can be re-derived at any time:
//!
//! ```text
//! final_cash_expected = initial_cash + cash_sales + entries - exits
//! difference          = final_cash_actual - final_cash_expected
//! ```
//!
//! Card and transfer sales never pass through the physical drawer, and
//! `cash_out` only seeds the next shift's float - neither enters the
//! expectation or the difference.

use shared::models::{Movement, MovementKind, SaleTotals};

/// Cash-side outcome of closing a shift
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashBalance {
    /// Sum of manual cash-in movements
    pub entries: f64,
    /// Sum of manual cash-out movements
    pub exits: f64,
    /// What the drawer should contain
    pub expected: f64,
    /// Counted minus expected: positive = overage, negative = shortage
    pub difference: f64,
}

/// Sum the movement log into (entries, exits)
pub fn movement_totals(movements: &[Movement]) -> (f64, f64) {
    movements.iter().fold((0.0, 0.0), |(ins, outs), m| match m.kind {
        MovementKind::In => (ins + m.amount, outs),
        MovementKind::Out => (ins, outs + m.amount),
    })
}

/// Expected drawer cash at close
pub fn expected_cash(initial_cash: f64, cash_sales: f64, movements: &[Movement]) -> f64 {
    let (entries, exits) = movement_totals(movements);
    initial_cash + cash_sales + entries - exits
}

/// Full reconciliation of a closing shift
pub fn reconcile(
    initial_cash: f64,
    cash_sales: f64,
    movements: &[Movement],
    final_cash_actual: f64,
) -> CashBalance {
    let (entries, exits) = movement_totals(movements);
    let expected = initial_cash + cash_sales + entries - exits;
    CashBalance {
        entries,
        exits,
        expected,
        difference: final_cash_actual - expected,
    }
}

/// Average ticket over a shift window (reporting only).
///
/// `None` when no tickets were recorded - never a division fault.
pub fn average_ticket(totals: &SaleTotals) -> Option<f64> {
    let tickets = totals.ticket_count();
    if tickets == 0 {
        None
    } else {
        Some(totals.gross_amount() / tickets as f64)
    }
}
