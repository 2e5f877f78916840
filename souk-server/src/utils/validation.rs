//! Input validation helpers
//!
//! Centralized text length constants and validation functions. Checkout
//! validates the delivery address with these before touching any row,
//! fail fast, no partial state.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: store, product, display name
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, rejection reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, usernames
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

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

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a positive quantity (cart lines, checkout lines).
pub fn validate_quantity(quantity: i64, field: &str) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

/// Validate a non-negative money amount.
pub fn validate_amount(amount: f64, field: &str) -> Result<(), AppError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be a non-negative amount"
        )));
    }
    Ok(())
}
