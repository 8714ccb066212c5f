//! Sale Model (read-only collaborator surface)
//!
//! The register ledger never creates or mutates sales; it only aggregates
//! the completed ones recorded by the ordering side of the platform, per
//! shift window and tenant.

use serde::{Deserialize, Serialize};

/// Payment method of a completed sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentMethod {
    /// Physical cash through the drawer
    Cash,
    CreditCard,
    DebitCard,
    Transfer,
}

/// Sale status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SaleStatus {
    Completed,
    Void,
}

/// Completed sale as the ledger sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub business_id: i64,
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub created_at: i64,
}

/// Ticket count + amount for one payment method
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MethodTotal {
    pub count: i64,
    pub amount: f64,
}

/// Per-method sale totals over a shift window
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SaleTotals {
    pub cash: MethodTotal,
    pub credit_card: MethodTotal,
    pub debit_card: MethodTotal,
    pub transfer: MethodTotal,
}

impl SaleTotals {
    /// Gross collected across every method (reporting only)
    pub fn gross_amount(&self) -> f64 {
        self.cash.amount + self.credit_card.amount + self.debit_card.amount + self.transfer.amount
    }

    /// Total number of tickets across every method
    pub fn ticket_count(&self) -> i64 {
        self.cash.count + self.credit_card.count + self.debit_card.count + self.transfer.count
    }
}
