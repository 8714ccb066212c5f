//! Input validation helpers
//!
//! Centralized limits and checks for cash amounts and operator-entered text.
//! SQLite TEXT has no built-in length enforcement, so caps live here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Movement reasons, notes
pub const MAX_REASON_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate a cash amount is finite and non-negative
pub fn validate_cash(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Validate a cash amount is finite and strictly positive
pub fn validate_positive_cash(value: f64, field: &str) -> Result<(), AppError> {
    validate_cash(value, field)?;
    if value == 0.0 {
        return Err(AppError::validation(format!("{field} must be greater than zero")));
    }
    Ok(())
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}
