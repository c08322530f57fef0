//! # Trade Math
//!
//! Mathematical calculations for trading indicators.
//! This crate provides the indicator primitives the forecasting features are
//! built from: trailing moving averages, the RSI oscillator, close-to-close
//! volatility ratios and volume normalization.

use thiserror::Error;

// Indicator modules
pub mod moving_averages;
pub mod oscillators;
pub mod volatility;
pub mod volume;

/// Errors that can occur in trading-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for trading math operations
pub type Result<T> = std::result::Result<T, MathError>;
