//! Day-by-day price path forecasting
//!
//! [`HybridForecaster`] fits the Lasso model on the trailing feature window,
//! then walks forward one trading day at a time. Each step combines a damped
//! trend, a decaying random volatility shock and the mean of a residual
//! bootstrap ensemble; the ensemble spread sets the confidence band.

use crate::data::BarSeries;
use crate::error::{ForecastError, Result};
use crate::features::FeatureMatrixBuilder;
use crate::models::ensemble::ResidualBootstrapEnsemble;
use crate::models::lasso::{LassoFit, LassoRegression};
use crate::params::ModelParams;
use crate::utils::{is_trading_day, next_calendar_day, round_to_cents};
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Closes used to estimate the average daily change
pub const TREND_LOOKBACK: usize = 10;

/// Share of the average daily change carried into every step
pub const TREND_WEIGHT: f64 = 0.3;

/// Size of the volatility shock relative to the last close
pub const VOLATILITY_SCALE: f64 = 0.02;

/// Per-day decay rate of the volatility shock
pub const TIME_DECAY_RATE: f64 = 0.05;

/// Share of the ensemble mean added to every step
pub const ENSEMBLE_WEIGHT: f64 = 0.1;

/// Two-sided 95% normal quantile used for the bands
pub const CONFIDENCE_Z: f64 = 1.96;

/// Direction of a predicted price relative to the last observed close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    /// Classify `price` against `reference`
    pub fn classify(price: f64, reference: f64) -> Self {
        if price > reference {
            Trend::Up
        } else if price < reference {
            Trend::Down
        } else {
            Trend::Neutral
        }
    }
}

/// Forecast for one trading day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Trading day the forecast applies to
    pub date: NaiveDate,
    /// Forecast close, rounded to cents
    pub predicted_price: f64,
    /// Lower band, rounded to cents
    pub confidence_interval_lower: f64,
    /// Upper band, rounded to cents
    pub confidence_interval_upper: f64,
    /// Direction versus the last observed close
    pub trend: Trend,
}

/// Half-width of the confidence band for an ensemble variance.
///
/// The standard deviation grows with `days_ahead^1.5`, so the band widens
/// faster than a random walk would.
pub fn confidence_half_width(variance: f64, days_ahead: usize) -> f64 {
    let std_dev = variance.max(0.0).sqrt() * (days_ahead as f64).powf(1.5);
    CONFIDENCE_Z * std_dev
}

/// Mean daily change across the last [`TREND_LOOKBACK`] closes
pub fn average_daily_change(closes: &[f64]) -> f64 {
    let recent = &closes[closes.len().saturating_sub(TREND_LOOKBACK)..];
    match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if recent.len() > 1 => (last - first) / (recent.len() - 1) as f64,
        _ => 0.0,
    }
}

/// Lasso + residual-ensemble forecaster
#[derive(Debug, Clone)]
pub struct HybridForecaster {
    params: ModelParams,
    features: FeatureMatrixBuilder,
    regression: LassoRegression,
    ensemble: ResidualBootstrapEnsemble,
}

impl HybridForecaster {
    /// Create a forecaster, rejecting unusable parameters up front
    pub fn new(params: ModelParams) -> Result<Self> {
        params.validate()?;
        let regression = LassoRegression::new(params.lasso_penalty)?;
        let ensemble = ResidualBootstrapEnsemble::new(params.n_estimators)?;

        Ok(Self {
            params,
            features: FeatureMatrixBuilder::default(),
            regression,
            ensemble,
        })
    }

    /// Parameters the forecaster was built with
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Fit the Lasso model on the trailing feature window of `series`
    pub fn fit(&self, series: &BarSeries) -> Result<Option<LassoFit>> {
        let matrix = self.features.build(series)?;
        if matrix.is_empty() {
            return Ok(None);
        }
        self.regression.fit(&matrix.rows, &matrix.targets).map(Some)
    }

    /// Forecast the next `forecast_days` trading days after the last bar.
    ///
    /// An empty series yields no predictions. Weekends are skipped without
    /// consuming a forecast step. Running off the end of the calendar is a
    /// [`ForecastError::DataError`].
    pub fn generate_predictions<R: Rng + ?Sized>(
        &self,
        series: &BarSeries,
        forecast_days: usize,
        rng: &mut R,
    ) -> Result<Vec<Prediction>> {
        let (Some(last_bar), Some(fit)) = (series.last(), self.fit(series)?) else {
            return Ok(Vec::new());
        };

        let last_price = last_bar.close;
        let avg_daily_change = average_daily_change(&series.closes());

        let mut predictions = Vec::with_capacity(forecast_days);
        let mut current_price = last_price;
        let mut current_date = last_bar.date;
        let mut days_ahead = 1usize;

        while predictions.len() < forecast_days {
            current_date = next_calendar_day(current_date).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Calendar ends after {} of {} trading days past {}",
                    predictions.len(),
                    forecast_days,
                    last_bar.date
                ))
            })?;
            if !is_trading_day(current_date) {
                continue;
            }

            let trend_component = avg_daily_change * TREND_WEIGHT;
            let volatility_component = (rng.gen::<f64>() - 0.5) * last_price * VOLATILITY_SCALE;
            let time_decay = (-(days_ahead as f64) * TIME_DECAY_RATE).exp();
            let summary = self.ensemble.summarize(&fit.residuals, days_ahead, rng);

            let daily_change = trend_component
                + volatility_component * time_decay
                + summary.mean * ENSEMBLE_WEIGHT;
            current_price += daily_change;

            let half_width = confidence_half_width(summary.variance, days_ahead);

            tracing::debug!(
                date = %current_date,
                days_ahead,
                price = current_price,
                ensemble_mean = summary.mean,
                ensemble_variance = summary.variance,
                "Forecast step"
            );

            predictions.push(Prediction {
                date: current_date,
                predicted_price: round_to_cents(current_price),
                confidence_interval_lower: round_to_cents(current_price - half_width),
                confidence_interval_upper: round_to_cents(current_price + half_width),
                trend: Trend::classify(current_price, last_price),
            });

            days_ahead += 1;
        }

        tracing::info!(
            bars = series.len(),
            forecast_days,
            last_price,
            final_price = predictions.last().map(|p| p.predicted_price),
            lasso_iterations = fit.iterations,
            "Generated forecast"
        );

        Ok(predictions)
    }
}

/// Forecast `forecast_days` trading days with a one-off [`HybridForecaster`]
pub fn generate_predictions<R: Rng + ?Sized>(
    series: &BarSeries,
    forecast_days: usize,
    params: &ModelParams,
    rng: &mut R,
) -> Result<Vec<Prediction>> {
    HybridForecaster::new(params.clone())?.generate_predictions(series, forecast_days, rng)
}
