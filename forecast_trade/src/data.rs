//! Bar series handling for forecasting
//!
//! [`BarSeries`] is the immutable, chronologically ordered input of the
//! forecaster. Series are produced by a [`BarSource`]; two sources ship with
//! the crate: [`CsvBarSource`] for exported daily history and
//! [`SyntheticBarSource`] for seeded random walks.

use crate::error::{ForecastError, Result};
use crate::utils::is_trading_day;
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, LogNormal, Normal};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading day of the bar
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
    /// Split/dividend adjusted close
    pub adj_close: f64,
}

/// Ordered sequence of daily bars, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Wrap bars that are already sorted by date with weekends removed
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    /// All bars, oldest first
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get the close prices as a vector
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Get the volumes as a vector
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.volume).collect()
    }

    /// The last `count` bars (all of them if the series is shorter)
    pub fn trailing(&self, count: usize) -> &[Bar] {
        &self.bars[self.bars.len().saturating_sub(count)..]
    }

    /// Split into the first `at` bars and the rest
    pub fn split_at(&self, at: usize) -> (BarSeries, BarSeries) {
        let at = at.min(self.bars.len());
        let (head, tail) = self.bars.split_at(at);
        (BarSeries::new(head.to_vec()), BarSeries::new(tail.to_vec()))
    }
}

impl From<Vec<Bar>> for BarSeries {
    fn from(bars: Vec<Bar>) -> Self {
        Self::new(bars)
    }
}

/// Anything that can hand the forecaster a bar series
pub trait BarSource {
    /// Human readable name used in logs
    fn name(&self) -> &str;

    /// Produce an ordered, weekday-only series
    fn load(&self) -> Result<BarSeries>;
}

/// Row layout of a daily-history CSV export
#[derive(Debug, Deserialize)]
struct CsvBarRecord {
    #[serde(alias = "Date", alias = "DATE", alias = "timestamp")]
    date: NaiveDate,
    #[serde(alias = "Open", alias = "OPEN")]
    open: f64,
    #[serde(alias = "High", alias = "HIGH")]
    high: f64,
    #[serde(alias = "Low", alias = "LOW")]
    low: f64,
    #[serde(alias = "Close", alias = "CLOSE")]
    close: f64,
    #[serde(default, alias = "Adj Close", alias = "adjClose", alias = "adj close")]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", alias = "VOLUME")]
    volume: f64,
}

impl From<CsvBarRecord> for Bar {
    fn from(record: CsvBarRecord) -> Self {
        Bar {
            date: record.date,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
            adj_close: record.adj_close.unwrap_or(record.close),
        }
    }
}

/// Loads bars from a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvBarSource {
    path: PathBuf,
    name: String,
}

impl CsvBarSource {
    /// Create a source reading from `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("csv:{}", path.display());
        Self { path, name }
    }

    /// Path of the CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BarSource for CsvBarSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<BarSeries> {
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut bars = Vec::new();
        let mut rejected = 0usize;

        for (row, record) in reader.deserialize::<CsvBarRecord>().enumerate() {
            let bar: Bar = match record {
                Ok(record) => record.into(),
                Err(e) => {
                    tracing::warn!(row = row + 1, error = %e, "Skipping unreadable CSV row");
                    rejected += 1;
                    continue;
                }
            };

            if !is_trading_day(bar.date) {
                tracing::warn!(row = row + 1, date = %bar.date, "Skipping weekend bar");
                rejected += 1;
                continue;
            }
            if !(bar.close > 0.0) {
                tracing::warn!(
                    row = row + 1,
                    close = bar.close,
                    "Skipping bar with non-positive close"
                );
                rejected += 1;
                continue;
            }

            bars.push(bar);
        }

        if bars.is_empty() && rejected > 0 {
            return Err(ForecastError::DataError(format!(
                "No usable bars in {} ({} rows rejected)",
                self.path.display(),
                rejected
            )));
        }

        bars.sort_by_key(|bar| bar.date);
        bars.dedup_by_key(|bar| bar.date);

        tracing::info!(
            source = %self.name,
            bars = bars.len(),
            rejected,
            "Loaded bars from CSV"
        );

        Ok(BarSeries::new(bars))
    }
}

/// Seeded geometric random walk over weekdays
#[derive(Debug, Clone)]
pub struct SyntheticBarSource {
    end_date: NaiveDate,
    days: usize,
    start_price: f64,
    daily_drift: f64,
    daily_volatility: f64,
    base_volume: f64,
    seed: u64,
}

impl SyntheticBarSource {
    /// `days` weekday bars ending on or before `end_date`
    pub fn new(end_date: NaiveDate, days: usize) -> Self {
        Self {
            end_date,
            days,
            start_price: 100.0,
            daily_drift: 0.0003,
            daily_volatility: 0.015,
            base_volume: 40_000_000.0,
            seed: 42,
        }
    }

    /// Set the close of the first generated bar
    pub fn with_start_price(mut self, start_price: f64) -> Self {
        self.start_price = start_price;
        self
    }

    /// Set the mean and standard deviation of daily log returns
    pub fn with_returns(mut self, daily_drift: f64, daily_volatility: f64) -> Self {
        self.daily_drift = daily_drift;
        self.daily_volatility = daily_volatility;
        self
    }

    /// Set the median daily volume
    pub fn with_base_volume(mut self, base_volume: f64) -> Self {
        self.base_volume = base_volume;
        self
    }

    /// Set the generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Weekday dates ending on or before `end_date`, oldest first
    fn trading_dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(self.days);
        let mut current = self.end_date;

        while dates.len() < self.days {
            if is_trading_day(current) {
                dates.push(current);
            }
            match current.checked_sub_days(Days::new(1)) {
                Some(previous) => current = previous,
                None => break,
            }
        }

        dates.reverse();
        dates
    }
}

impl BarSource for SyntheticBarSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn load(&self) -> Result<BarSeries> {
        if !(self.start_price > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Start price must be positive".to_string(),
            ));
        }
        if !(self.base_volume > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Base volume must be positive".to_string(),
            ));
        }

        let returns = Normal::new(self.daily_drift, self.daily_volatility)
            .map_err(|e| ForecastError::InvalidParameter(format!("Return distribution: {}", e)))?;
        let range = Normal::new(0.0, self.daily_volatility / 2.0)
            .map_err(|e| ForecastError::InvalidParameter(format!("Range distribution: {}", e)))?;
        let volume = LogNormal::new(self.base_volume.ln(), 0.25)
            .map_err(|e| ForecastError::InvalidParameter(format!("Volume distribution: {}", e)))?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut previous_close = self.start_price;
        let mut bars = Vec::with_capacity(self.days);

        for (i, date) in self.trading_dates().into_iter().enumerate() {
            let open = previous_close;
            let close = if i == 0 {
                self.start_price
            } else {
                previous_close * returns.sample(&mut rng).exp()
            };
            let high = open.max(close) * (1.0 + range.sample(&mut rng).abs());
            let low = open.min(close) * (1.0 - range.sample(&mut rng).abs().min(0.5));

            bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                volume: volume.sample(&mut rng).round(),
                adj_close: close,
            });
            previous_close = close;
        }

        tracing::debug!(bars = bars.len(), seed = self.seed, "Generated synthetic bars");

        Ok(BarSeries::new(bars))
    }
}
