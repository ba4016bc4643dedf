//! Regular price validation.
//!
//! Prices travel as decimal strings because the catalog stores whatever the
//! operator typed, including the empty string for "no price". A non-empty
//! value must parse as a non-negative decimal.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced when a price string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("Invalid price: {0:?} is not a decimal number")]
    NotANumber(String),
    #[error("Invalid price: {0} is negative")]
    Negative(Decimal),
}

/// Parse a regular price string.
///
/// Returns `Ok(None)` for an empty (or whitespace-only) value.
///
/// # Errors
///
/// Returns `PriceError` if the value is not a decimal or is negative.
pub fn parse_regular_price(value: &str) -> Result<Option<Decimal>, PriceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let amount =
        Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::Negative(amount));
    }
    Ok(Some(amount))
}
