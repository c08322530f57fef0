//! Moving average calculation implementations
//!
//! Contains the trailing Simple Moving Average (SMA) used by the feature
//! pipeline. The average never looks ahead: at index `i` it only consumes
//! closes `..=i`, and near the start of a series it shrinks to the
//! observations that exist.

use crate::{MathError, Result};

/// Trailing Simple Moving Average ending at `end` (inclusive).
///
/// Averages the last `period` values of `values[..=end]`, or fewer when
/// `end + 1 < period`.
pub fn trailing_sma(values: &[f64], end: usize, period: usize) -> Result<f64> {
    if period == 0 {
        return Err(MathError::InvalidInput(
            "Period must be greater than zero".to_string(),
        ));
    }
    if end >= values.len() {
        return Err(MathError::InvalidInput(format!(
            "Index {} is out of range for {} values",
            end,
            values.len()
        )));
    }

    let start = (end + 1).saturating_sub(period);
    let window = &values[start..=end];

    Ok(window.iter().sum::<f64>() / window.len() as f64)
}

/// [`trailing_sma`] at every index of `values`
pub fn trailing_sma_series(values: &[f64], period: usize) -> Result<Vec<f64>> {
    if period == 0 {
        return Err(MathError::InvalidInput(
            "Period must be greater than zero".to_string(),
        ));
    }

    (0..values.len())
        .map(|end| trailing_sma(values, end, period))
        .collect()
}
