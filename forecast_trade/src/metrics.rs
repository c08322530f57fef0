//! Metrics for evaluating forecast performance against realized bars

use crate::data::{Bar, BarSeries};
use crate::error::{ForecastError, Result};
use crate::forecast::{HybridForecaster, Prediction};
use rand::Rng;
use std::collections::HashMap;

/// Forecast performance metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastMetrics {
    /// Predictions that had a realized bar on the same date
    pub matched: usize,
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error
    pub mape: f64,
    /// Share of day-over-day moves with the right sign, in percent
    pub direction_accuracy: f64,
    /// Share of realized closes inside the confidence band, in percent
    pub interval_coverage: f64,
}

impl std::fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Performance Metrics ({} days):", self.matched)?;
        writeln!(f, "  MAE:       {:.4}", self.mae)?;
        writeln!(f, "  RMSE:      {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:      {:.4}%", self.mape)?;
        writeln!(f, "  Direction: {:.2}%", self.direction_accuracy)?;
        writeln!(f, "  Coverage:  {:.2}%", self.interval_coverage)?;
        Ok(())
    }
}

/// Compare predictions with realized bars sharing the same date.
///
/// `reference_close` is the last close known when the forecast was made; it
/// anchors the direction of the first matched day.
pub fn evaluate_predictions(
    predictions: &[Prediction],
    actual: &[Bar],
    reference_close: f64,
) -> Result<ForecastMetrics> {
    let closes: HashMap<_, _> = actual.iter().map(|bar| (bar.date, bar.close)).collect();
    let pairs: Vec<(&Prediction, f64)> = predictions
        .iter()
        .filter_map(|p| closes.get(&p.date).map(|&close| (p, close)))
        .collect();

    if pairs.is_empty() {
        return Err(ForecastError::ValidationError(
            "No prediction dates overlap the realized bars".to_string(),
        ));
    }

    let n = pairs.len() as f64;
    let errors: Vec<f64> = pairs
        .iter()
        .map(|(p, actual)| actual - p.predicted_price)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let rmse = (errors.iter().map(|e| e.powi(2)).sum::<f64>() / n).sqrt();
    let mape = pairs
        .iter()
        .zip(&errors)
        .filter(|((_, actual), _)| *actual != 0.0)
        .map(|((_, actual), e)| (e.abs() / actual.abs()) * 100.0)
        .sum::<f64>()
        / n;

    let mut previous_predicted = reference_close;
    let mut previous_actual = reference_close;
    let mut direction_hits = 0usize;
    let mut direction_total = 0usize;
    for (p, actual) in &pairs {
        let predicted_move = p.predicted_price - previous_predicted;
        let actual_move = actual - previous_actual;
        if predicted_move.abs() > 1e-10 && actual_move.abs() > 1e-10 {
            direction_total += 1;
            if (predicted_move > 0.0) == (actual_move > 0.0) {
                direction_hits += 1;
            }
        }
        previous_predicted = p.predicted_price;
        previous_actual = *actual;
    }
    let direction_accuracy = if direction_total > 0 {
        direction_hits as f64 / direction_total as f64 * 100.0
    } else {
        0.0
    };

    let covered = pairs
        .iter()
        .filter(|(p, actual)| {
            *actual >= p.confidence_interval_lower && *actual <= p.confidence_interval_upper
        })
        .count();

    Ok(ForecastMetrics {
        matched: pairs.len(),
        mae,
        rmse,
        mape,
        direction_accuracy,
        interval_coverage: covered as f64 / n * 100.0,
    })
}

/// Withhold the last `holdout` bars, forecast them and score the forecast
pub fn holdout_backtest<R: Rng + ?Sized>(
    forecaster: &HybridForecaster,
    series: &BarSeries,
    holdout: usize,
    rng: &mut R,
) -> Result<ForecastMetrics> {
    if holdout == 0 || series.len() <= holdout {
        return Err(ForecastError::ValidationError(format!(
            "Holdout of {} bars needs a longer series (have {})",
            holdout,
            series.len()
        )));
    }

    let (train, test) = series.split_at(series.len() - holdout);
    let reference_close = train.last().map(|bar| bar.close).unwrap_or_default();
    let predictions = forecaster.generate_predictions(&train, holdout, rng)?;

    let metrics = evaluate_predictions(&predictions, test.bars(), reference_close)?;
    tracing::info!(
        holdout,
        matched = metrics.matched,
        mae = metrics.mae,
        coverage = metrics.interval_coverage,
        "Holdout evaluation finished"
    );

    Ok(metrics)
}
