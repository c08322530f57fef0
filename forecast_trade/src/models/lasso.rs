//! L1-penalized linear regression fitted by cyclic coordinate descent

use crate::error::{ForecastError, Result};
use crate::features::FEATURE_NAMES;

/// Outer coordinate-descent sweeps before giving up on convergence
pub const MAX_ITERATIONS: usize = 100;

/// Total absolute coefficient change that counts as converged
pub const TOLERANCE: f64 = 1e-4;

/// Lasso regression settings
#[derive(Debug, Clone)]
pub struct LassoRegression {
    /// Name of the model
    name: String,
    /// L1 penalty (lambda)
    penalty: f64,
    /// Maximum outer iterations
    max_iterations: usize,
    /// Convergence threshold on the summed coefficient change
    tolerance: f64,
}

/// Result of fitting a [`LassoRegression`]
#[derive(Debug, Clone, PartialEq)]
pub struct LassoFit {
    /// One coefficient per column, in the standardized feature space
    pub coefficients: Vec<f64>,
    /// Target minus fitted value for each training row
    pub residuals: Vec<f64>,
    /// Column means used for standardization (column 0 left at 0)
    pub means: Vec<f64>,
    /// Column standard deviations used for standardization (column 0 left at 1)
    pub stds: Vec<f64>,
    /// Outer iterations performed
    pub iterations: usize,
    /// Whether the tolerance was reached before the iteration cap
    pub converged: bool,
}

/// Named coefficient of a fitted model
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    /// Feature column name
    pub name: String,
    /// Coefficient in the standardized space
    pub coefficient: f64,
}

/// Soft-thresholding operator used by the coordinate update
pub fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

/// Column means and population standard deviations, skipping the intercept.
///
/// A constant column gets a standard deviation of 1.
fn column_moments<R: AsRef<[f64]>>(rows: &[R], width: usize) -> (Vec<f64>, Vec<f64>) {
    let n = rows.len() as f64;
    let mut means = vec![0.0; width];
    let mut stds = vec![1.0; width];

    for j in 1..width {
        let mean = rows.iter().map(|row| row.as_ref()[j]).sum::<f64>() / n;
        let variance = rows
            .iter()
            .map(|row| (row.as_ref()[j] - mean).powi(2))
            .sum::<f64>()
            / n;
        let std = variance.sqrt();

        means[j] = mean;
        stds[j] = if std == 0.0 { 1.0 } else { std };
    }

    (means, stds)
}

impl LassoRegression {
    /// Create a new Lasso model with penalty `lambda >= 0`
    pub fn new(penalty: f64) -> Result<Self> {
        if !penalty.is_finite() || penalty < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Lasso penalty must be a finite non-negative number, got {}",
                penalty
            )));
        }

        Ok(Self {
            name: format!("Lasso (lambda={})", penalty),
            penalty,
            max_iterations: MAX_ITERATIONS,
            tolerance: TOLERANCE,
        })
    }

    /// Get the name of the model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// L1 penalty
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Fit coefficients to `rows` (column 0 must be the intercept) and `targets`
    pub fn fit<R: AsRef<[f64]>>(&self, rows: &[R], targets: &[f64]) -> Result<LassoFit> {
        if rows.is_empty() {
            return Err(ForecastError::DataError(
                "Cannot fit Lasso on an empty feature matrix".to_string(),
            ));
        }
        if rows.len() != targets.len() {
            return Err(ForecastError::ValidationError(format!(
                "Feature rows ({}) don't match targets ({})",
                rows.len(),
                targets.len()
            )));
        }

        let width = rows[0].as_ref().len();
        if width == 0 {
            return Err(ForecastError::ValidationError(
                "Feature rows must have at least one column".to_string(),
            ));
        }
        if let Some(bad) = rows.iter().position(|row| row.as_ref().len() != width) {
            return Err(ForecastError::ValidationError(format!(
                "Row {} has {} columns, expected {}",
                bad,
                rows[bad].as_ref().len(),
                width
            )));
        }

        let n = rows.len();
        let (means, stds) = column_moments(rows, width);
        let standardized: Vec<Vec<f64>> = rows
            .iter()
            .map(|row| {
                row.as_ref()
                    .iter()
                    .enumerate()
                    .map(|(j, &x)| if j == 0 { x } else { (x - means[j]) / stds[j] })
                    .collect()
            })
            .collect();

        let threshold = self.penalty / n as f64;
        let mut coefficients = vec![0.0; width];
        let mut fitted = vec![0.0; n];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;
            let mut total_change = 0.0;

            for j in 0..width {
                let old = coefficients[j];

                // Correlation of column j with the residual that excludes it
                let rho = standardized
                    .iter()
                    .zip(targets)
                    .zip(&fitted)
                    .map(|((row, &y), &fit)| row[j] * (y - (fit - row[j] * old)))
                    .sum::<f64>()
                    / n as f64;

                let new = if j == 0 {
                    rho
                } else {
                    soft_threshold(rho, threshold)
                };

                if new != old {
                    let delta = new - old;
                    for (fit, row) in fitted.iter_mut().zip(&standardized) {
                        *fit += row[j] * delta;
                    }
                    coefficients[j] = new;
                }
                total_change += (new - old).abs();
            }

            if total_change < self.tolerance {
                converged = true;
                break;
            }
        }

        let residuals = standardized
            .iter()
            .zip(targets)
            .map(|(row, &y)| {
                y - row
                    .iter()
                    .zip(&coefficients)
                    .map(|(x, beta)| x * beta)
                    .sum::<f64>()
            })
            .collect();

        tracing::debug!(
            model = %self.name,
            rows = n,
            columns = width,
            iterations,
            converged,
            "Lasso fit finished"
        );

        Ok(LassoFit {
            coefficients,
            residuals,
            means,
            stds,
            iterations,
            converged,
        })
    }
}

impl LassoFit {
    /// Prediction for an unstandardized row with the same layout as training
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ForecastError::ValidationError(format!(
                "Row has {} columns, model expects {}",
                row.len(),
                self.coefficients.len()
            )));
        }

        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &x)| {
                let x = if j == 0 {
                    x
                } else {
                    (x - self.means[j]) / self.stds[j]
                };
                x * self.coefficients[j]
            })
            .sum())
    }

    /// Non-intercept coefficients paired with their feature names.
    ///
    /// Names come from the standard feature layout; extra columns fall back to
    /// `x{index}`.
    pub fn feature_importance(&self) -> Vec<FeatureImportance> {
        self.coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(j, &coefficient)| FeatureImportance {
                name: FEATURE_NAMES
                    .get(j)
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| format!("x{}", j)),
                coefficient,
            })
            .collect()
    }

    /// Features whose absolute coefficient reaches `threshold`, largest first
    pub fn active_features(&self, threshold: f64) -> Vec<FeatureImportance> {
        let mut active: Vec<FeatureImportance> = self
            .feature_importance()
            .into_iter()
            .filter(|feature| feature.coefficient.abs() >= threshold)
            .collect();
        active.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
        active
    }

    /// Sum of absolute non-intercept coefficients
    pub fn l1_norm(&self) -> f64 {
        self.coefficients.iter().skip(1).map(|c| c.abs()).sum()
    }
}
