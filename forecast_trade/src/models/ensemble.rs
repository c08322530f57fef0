//! Residual bootstrap ensemble
//!
//! Simulates the spread of a tree ensemble without growing trees: every
//! member is the mean of a bootstrap resample of the regression residuals,
//! plus a small uniform perturbation that widens with the forecast horizon.

use crate::error::{ForecastError, Result};
use rand::Rng;
use statrs::statistics::Statistics;

/// Scale of the per-member perturbation at one day ahead
pub const PERTURBATION_SCALE: f64 = 0.01;

/// Bootstrap ensemble over regression residuals
#[derive(Debug, Clone)]
pub struct ResidualBootstrapEnsemble {
    n_estimators: usize,
}

/// Mean and population variance of one ensemble draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleSummary {
    /// Average member prediction
    pub mean: f64,
    /// Population variance of the member predictions
    pub variance: f64,
}

impl EnsembleSummary {
    /// Summarize a set of member predictions; empty input summarizes to zeros
    pub fn from_predictions(predictions: &[f64]) -> Self {
        if predictions.is_empty() {
            return Self {
                mean: 0.0,
                variance: 0.0,
            };
        }

        Self {
            mean: predictions.iter().mean(),
            variance: predictions.iter().population_variance(),
        }
    }
}

impl ResidualBootstrapEnsemble {
    /// Create an ensemble with `n_estimators >= 1` members
    pub fn new(n_estimators: usize) -> Result<Self> {
        if n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "Ensemble needs at least one estimator".to_string(),
            ));
        }

        Ok(Self { n_estimators })
    }

    /// Number of members
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// One residual prediction per member for the `days_ahead`-th forecast day
    pub fn predict<R: Rng + ?Sized>(
        &self,
        residuals: &[f64],
        days_ahead: usize,
        rng: &mut R,
    ) -> Vec<f64> {
        let n = residuals.len();
        let spread = PERTURBATION_SCALE * (days_ahead as f64).sqrt();

        (0..self.n_estimators)
            .map(|_| {
                let bootstrap_mean = if n == 0 {
                    0.0
                } else {
                    (0..n).map(|_| residuals[rng.gen_range(0..n)]).sum::<f64>() / n as f64
                };
                bootstrap_mean + spread * (rng.gen::<f64>() - 0.5)
            })
            .collect()
    }

    /// Draw a prediction set and summarize it
    pub fn summarize<R: Rng + ?Sized>(
        &self,
        residuals: &[f64],
        days_ahead: usize,
        rng: &mut R,
    ) -> EnsembleSummary {
        EnsembleSummary::from_predictions(&self.predict(residuals, days_ahead, rng))
    }
}
