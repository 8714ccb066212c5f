//! Movement Model (manual cash in/out)

use serde::{Deserialize, Serialize};

/// Movement direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MovementKind {
    /// Cash added to the drawer (top-up, loan, change float)
    In,
    /// Cash taken out of the drawer (supplies, petty expenses)
    Out,
}

impl MovementKind {
    /// The compensating direction used by reversals
    pub fn opposite(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }
}

/// A manual, non-sale cash adjustment recorded against an open shift.
///
/// Append-only: movements are never edited or deleted. A mistake is
/// corrected by recording an opposite-kind movement whose `reversal_of`
/// points back at the original.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Movement {
    pub id: i64,

    /// Owning shift
    pub shift_id: i64,

    /// Direction
    pub kind: MovementKind,

    /// Amount, strictly positive
    pub amount: f64,

    /// Operator-entered justification, required
    pub reason: String,

    /// Set when this movement compensates an earlier one
    pub reversal_of: Option<i64>,

    /// Server-assigned creation time (Unix millis)
    pub created_at: i64,
}

/// Create movement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementCreate {
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub amount: f64,
    pub reason: String,
}

/// Reverse movement payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementReverse {
    /// Override for the generated "Reversal of ..." reason
    pub reason: Option<String>,
}
