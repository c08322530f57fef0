//! Volatility indicator implementations
//!
//! Contains the per-bar return ratios used as regression features:
//! - Absolute close-to-close volatility
//! - Signed close-to-close price change

use crate::{MathError, Result};

/// Signed relative change from `previous` to `current`
pub fn price_change(previous: f64, current: f64) -> Result<f64> {
    if previous == 0.0 {
        return Err(MathError::CalculationError(
            "Previous close must be non-zero".to_string(),
        ));
    }

    Ok((current - previous) / previous)
}

/// Signed relative change for each close, 0 for the first one
pub fn price_change_series(closes: &[f64]) -> Result<Vec<f64>> {
    let mut changes = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return Ok(changes);
    }

    changes.push(0.0);
    for pair in closes.windows(2) {
        changes.push(price_change(pair[0], pair[1])?);
    }

    Ok(changes)
}

/// Absolute relative change for each close, 0 for the first one
pub fn volatility_series(closes: &[f64]) -> Result<Vec<f64>> {
    Ok(price_change_series(closes)?
        .into_iter()
        .map(f64::abs)
        .collect())
}
