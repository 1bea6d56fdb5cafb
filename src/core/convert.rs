//! Amount conversion between catalog currencies via the base currency

use super::currency::CurrencyCode;
use super::store::RateStore;
use thiserror::Error;

/// Decimal places used when presenting converted values and rates.
pub const DISPLAY_DECIMALS: usize = 4;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Rate unavailable for {0}")]
    RateUnavailable(CurrencyCode),
    #[error("Converted value is out of range")]
    OutOfRange,
}

pub fn parse_amount(input: &str) -> Result<f64, ConversionError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ConversionError::InvalidAmount(trimmed.to_string())),
    }
}

/// Converts `amount` of `from` into `to`.
///
/// Full precision is kept; round with [`round_for_display`] only when
/// presenting.
pub fn convert(
    amount: f64,
    from: CurrencyCode,
    to: CurrencyCode,
    store: &RateStore,
) -> Result<f64, ConversionError> {
    if !amount.is_finite() {
        return Err(ConversionError::InvalidAmount(amount.to_string()));
    }
    if from == to {
        return Ok(amount);
    }

    let in_base = if from.is_base() {
        amount
    } else {
        amount / known_rate(from, store)?
    };
    let converted = if to.is_base() {
        in_base
    } else {
        in_base * known_rate(to, store)?
    };

    if converted.is_finite() {
        Ok(converted)
    } else {
        Err(ConversionError::OutOfRange)
    }
}

/// Units of `to` obtainable for one unit of `from`.
pub fn cross_rate(
    from: CurrencyCode,
    to: CurrencyCode,
    store: &RateStore,
) -> Result<f64, ConversionError> {
    if from == to {
        return Ok(1.0);
    }
    let rate = known_rate(to, store)? / known_rate(from, store)?;
    if rate.is_finite() {
        Ok(rate)
    } else {
        Err(ConversionError::OutOfRange)
    }
}

pub fn round_for_display(value: f64) -> f64 {
    let factor = 10f64.powi(DISPLAY_DECIMALS as i32);
    let scaled = value * factor;
    // Values this large have no fractional digits left to round
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Rounds and prints with exactly [`DISPLAY_DECIMALS`] fraction digits.
pub fn format_rate(value: f64) -> String {
    format!("{:.*}", DISPLAY_DECIMALS, round_for_display(value))
}

/// Formats with two to four fraction digits followed by the currency code.
pub fn format_amount(value: f64, code: CurrencyCode) -> String {
    let mut text = format_rate(value);
    if let Some(dot) = text.find('.') {
        let min_len = dot + 3;
        while text.len() > min_len && text.ends_with('0') {
            text.pop();
        }
    }
    format!("{text} {code}")
}

fn known_rate(code: CurrencyCode, store: &RateStore) -> Result<f64, ConversionError> {
    let rate = store.current_rate(code);
    if rate > 0.0 {
        Ok(rate)
    } else {
        Err(ConversionError::RateUnavailable(code))
    }
}
