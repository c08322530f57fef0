//! # Forecast Trade
//!
//! A Rust library for forecasting a daily price path with confidence bands.
//!
//! ## Features
//!
//! - Daily bar series with CSV and synthetic bar sources
//! - Technical-indicator feature matrix (SMA, RSI, volatility, volume ratios)
//! - Lasso regression fitted by cyclic coordinate descent
//! - Residual bootstrap ensemble for horizon-dependent uncertainty
//! - Trading-day forecast loop that skips weekends
//! - Holdout evaluation of a forecast against realized bars
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use forecast_trade::data::{BarSource, SyntheticBarSource};
//! use forecast_trade::{HybridForecaster, ModelParams};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn main() -> forecast_trade::error::Result<()> {
//! // Load data
//! let end = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
//! let series = SyntheticBarSource::new(end, 120).with_seed(1).load()?;
//!
//! // Create the forecaster
//! let forecaster = HybridForecaster::new(ModelParams::default().with_n_estimators(20))?;
//!
//! // Forecast the next five trading days
//! let mut rng = StdRng::seed_from_u64(7);
//! let predictions = forecaster.generate_predictions(&series, 5, &mut rng)?;
//! assert_eq!(predictions.len(), 5);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod features;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod params;
pub mod utils;

// Re-export commonly used types
pub use crate::data::{Bar, BarSeries, BarSource};
pub use crate::error::ForecastError;
pub use crate::forecast::{generate_predictions, HybridForecaster, Prediction, Trend};
pub use crate::params::{ForecastConfig, ModelParams};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
