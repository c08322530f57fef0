//! Feature matrix construction
//!
//! Turns the trailing window of a [`BarSeries`] into fixed-width regression
//! rows. Column 0 is a constant intercept; the remaining twelve columns are
//! indicator values and their interactions, in the order of
//! [`FEATURE_NAMES`].

use crate::data::BarSeries;
use crate::error::Result;
use trade_math::moving_averages::trailing_sma_series;
use trade_math::oscillators::relative_strength_index;
use trade_math::volatility::{price_change_series, volatility_series};
use trade_math::volume::volume_ratio;

/// Number of columns in a feature row, intercept included
pub const FEATURE_COUNT: usize = 13;

/// Maximum number of trailing bars turned into rows
pub const FEATURE_WINDOW: usize = 60;

/// Column names, index-aligned with [`FeatureRow`]
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "intercept",
    "close",
    "sma5",
    "sma20",
    "rsi",
    "volatility",
    "price_change",
    "volume_ratio",
    "sma_ratio",
    "volatility_squared",
    "rsi_normalized",
    "close_x_volatility",
    "sma5_x_rsi",
];

const SHORT_SMA_PERIOD: usize = 5;
const LONG_SMA_PERIOD: usize = 20;

/// One regression row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow(pub [f64; FEATURE_COUNT]);

impl FeatureRow {
    /// Value of the named column, if the name exists
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|idx| self.0[idx])
    }
}

impl AsRef<[f64]> for FeatureRow {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Feature rows and the closes they are trained against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    /// One row per windowed bar, oldest first
    pub rows: Vec<FeatureRow>,
    /// Close of the bar each row was built from
    pub targets: Vec<f64>,
}

impl FeatureMatrix {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds a [`FeatureMatrix`] from the tail of a bar series
#[derive(Debug, Clone)]
pub struct FeatureMatrixBuilder {
    window: usize,
}

impl Default for FeatureMatrixBuilder {
    fn default() -> Self {
        Self {
            window: FEATURE_WINDOW,
        }
    }
}

impl FeatureMatrixBuilder {
    /// Builder with a custom trailing window (at least one bar)
    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// Trailing window size
    pub fn window(&self) -> usize {
        self.window
    }

    /// Build one row per bar of the last `min(window, len)` bars.
    ///
    /// Every indicator is computed inside the window only, so the first rows
    /// see shorter averages and a neutral RSI.
    pub fn build(&self, series: &BarSeries) -> Result<FeatureMatrix> {
        let bars = series.trailing(self.window);
        if bars.is_empty() {
            return Ok(FeatureMatrix::default());
        }

        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let sma_short = trailing_sma_series(&closes, SHORT_SMA_PERIOD)?;
        let sma_long = trailing_sma_series(&closes, LONG_SMA_PERIOD)?;
        let changes = price_change_series(&closes)?;
        let volatilities = volatility_series(&closes)?;

        let mut rows = Vec::with_capacity(bars.len());
        for (i, bar) in bars.iter().enumerate() {
            let close = closes[i];
            let sma5 = sma_short[i];
            let sma20 = sma_long[i];
            let rsi = relative_strength_index(&closes[..=i]);
            let price_change = changes[i];
            let volatility = volatilities[i];

            rows.push(FeatureRow([
                1.0,
                close,
                sma5,
                sma20,
                rsi,
                volatility,
                price_change,
                volume_ratio(bar.volume)?,
                sma5 / sma20,
                volatility * volatility,
                (rsi - 50.0) / 50.0,
                close * volatility,
                sma5 * rsi / 100.0,
            ]));
        }

        tracing::debug!(rows = rows.len(), window = self.window, "Built feature matrix");

        Ok(FeatureMatrix {
            rows,
            targets: closes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar;
    use approx::assert_relative_eq;
    use chrono::{Days, NaiveDate};

    fn series_from_closes(closes: &[f64]) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 20_000_000.0,
                adj_close: close,
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_window_is_capped() {
        let closes: Vec<f64> = (0..75).map(|i| 100.0 + i as f64).collect();
        let matrix = FeatureMatrixBuilder::default().build(&series_from_closes(&closes)).unwrap();

        assert_eq!(matrix.len(), FEATURE_WINDOW);
        assert_eq!(matrix.targets.len(), FEATURE_WINDOW);
        assert_eq!(matrix.targets[0], 115.0);
        assert_eq!(*matrix.targets.last().unwrap(), 174.0);
    }

    #[test]
    fn test_short_series_uses_every_bar() {
        let matrix = FeatureMatrixBuilder::default()
            .build(&series_from_closes(&[10.0, 11.0, 12.0]))
            .unwrap();
        assert_eq!(matrix.len(), 3);

        let empty = FeatureMatrixBuilder::default().build(&BarSeries::default()).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_row_layout() {
        let closes = [100.0, 110.0, 99.0];
        let matrix = FeatureMatrixBuilder::default().build(&series_from_closes(&closes)).unwrap();
        let row = matrix.rows[2];

        assert_eq!(row.get("intercept"), Some(1.0));
        assert_eq!(row.get("close"), Some(99.0));
        assert_relative_eq!(row.get("sma5").unwrap(), 103.0);
        assert_relative_eq!(row.get("sma20").unwrap(), 103.0);
        assert_eq!(row.get("rsi"), Some(50.0));
        assert_relative_eq!(row.get("volatility").unwrap(), 0.1);
        assert_relative_eq!(row.get("price_change").unwrap(), -0.1);
        assert_relative_eq!(row.get("volume_ratio").unwrap(), 0.5);
        assert_relative_eq!(row.get("sma_ratio").unwrap(), 1.0);
        assert_relative_eq!(row.get("volatility_squared").unwrap(), 0.01);
        assert_eq!(row.get("rsi_normalized"), Some(0.0));
        assert_relative_eq!(row.get("close_x_volatility").unwrap(), 9.9);
        assert_relative_eq!(row.get("sma5_x_rsi").unwrap(), 51.5);
        assert_eq!(row.get("unknown"), None);

        let first = matrix.rows[0];
        assert_eq!(first.get("volatility"), Some(0.0));
        assert_eq!(first.get("price_change"), Some(0.0));
    }

    #[test]
    fn test_rsi_grows_with_the_window() {
        // Strictly rising closes: RSI leaves 50 once 14 bars are visible
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + 14.0 * i as f64).collect();
        let matrix = FeatureMatrixBuilder::default().build(&series_from_closes(&closes)).unwrap();

        for (i, row) in matrix.rows.iter().enumerate() {
            let rsi = row.get("rsi").unwrap();
            if i < 13 {
                assert_eq!(rsi, 50.0, "row {}", i);
            } else {
                assert!(rsi > 50.0, "row {} rsi {}", i, rsi);
            }
        }
    }
}
