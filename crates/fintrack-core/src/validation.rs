//! Syntactic validation of raw user input.
//!
//! These helpers turn text collected by an input surface into the typed values
//! the ledger operations accept. They never touch ledger state.

use fintrack_domain::TransactionKind;

use crate::CoreError;

/// Parses a decimal amount. Accepts surrounding whitespace and a single
/// leading `$`. Rejects empty input, `NaN` and infinities.
pub fn parse_amount(raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    if digits.is_empty() {
        return Err(CoreError::InvalidInput("an amount is required".into()));
    }
    let value: f64 = digits
        .parse()
        .map_err(|_| CoreError::InvalidInput(format!("`{}` is not a number", trimmed)))?;
    ensure_finite(value, "amount")
}

/// Rejects `NaN` and infinite values.
pub fn ensure_finite(value: f64, field: &str) -> Result<f64, CoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::InvalidInput(format!(
            "{} must be a finite number",
            field
        )))
    }
}

/// Transaction amounts must be finite and not negative; the kind carries the sign.
pub fn ensure_transaction_amount(value: f64) -> Result<f64, CoreError> {
    let value = ensure_finite(value, "amount")?;
    if value < 0.0 {
        return Err(CoreError::InvalidInput(
            "amount must not be negative; use the transaction type for direction".into(),
        ));
    }
    Ok(value)
}

/// Returns the trimmed description, or an error when nothing remains.
pub fn parse_description(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(CoreError::InvalidInput("a description is required".into()))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Maps the type selector values onto a [`TransactionKind`].
pub fn parse_kind(raw: &str) -> Result<TransactionKind, CoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "add" | "credit" | "income" | "+" => Ok(TransactionKind::Credit),
        "subtract" | "debit" | "expense" | "-" => Ok(TransactionKind::Debit),
        other => Err(CoreError::InvalidInput(format!(
            "unknown transaction type `{}` (expected add or subtract)",
            other
        ))),
    }
}

/// Converts a 1-based position typed by the user into a ledger index.
pub fn parse_position(raw: &str) -> Result<usize, CoreError> {
    let trimmed = raw.trim().trim_start_matches('#');
    match trimmed.parse::<usize>() {
        Ok(0) | Err(_) => Err(CoreError::InvalidInput(format!(
            "`{}` is not a valid position (positions start at 1)",
            raw.trim()
        ))),
        Ok(position) => Ok(position - 1),
    }
}
