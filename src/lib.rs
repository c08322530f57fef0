//! # Owl Forecast
//!
//! Umbrella crate for the workspace. Re-exports the indicator math and the
//! price forecaster so callers can depend on a single crate.
//!
//! ## Example
//!
//! ```
//! use owl_forecast_workspace::forecast::ForecastConfig;
//! use owl_forecast_workspace::math::oscillators::relative_strength_index;
//!
//! let config = ForecastConfig::from_toml_str("[forecast]\ndays = 5\n").unwrap();
//! assert_eq!(config.forecast.days, 5);
//!
//! // Steady gains with one pullback
//! let closes: Vec<f64> = (0..20)
//!     .map(|i| if i == 10 { 115.0 } else { 100.0 + 2.0 * i as f64 })
//!     .collect();
//! assert!(relative_strength_index(&closes) > 50.0);
//! ```

pub use forecast_trade as forecast;
pub use trade_math as math;
