//! Model parameters and forecast configuration
//!
//! `ModelParams` mirrors the options the hybrid model has always accepted.
//! Only `n_estimators` and `lasso_penalty` drive the forecast; the tree and
//! weighting options are carried so existing configurations keep loading.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options of the hybrid Lasso / residual-ensemble model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Ensemble width
    pub n_estimators: usize,
    /// Accepted for compatibility, not used by the residual ensemble
    pub max_depth: usize,
    /// Accepted for compatibility, not used by the residual ensemble
    pub min_samples_split: usize,
    /// Accepted for compatibility, not used by the residual ensemble
    pub min_samples_leaf: usize,
    /// Legacy blend weight between regression and ensemble, not used
    pub regression_weight: f64,
    /// Minimum |coefficient| reported as an active feature
    pub feature_importance_threshold: f64,
    /// L1 penalty of the Lasso fit
    pub lasso_penalty: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            regression_weight: 0.5,
            feature_importance_threshold: 0.01,
            lasso_penalty: 0.1,
        }
    }
}

impl ModelParams {
    /// Set the ensemble width
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Set the Lasso penalty
    pub fn with_lasso_penalty(mut self, lasso_penalty: f64) -> Self {
        self.lasso_penalty = lasso_penalty;
        self
    }

    /// Check the options the forecast actually consumes
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !self.lasso_penalty.is_finite() || self.lasso_penalty < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "lasso_penalty must be a finite non-negative number, got {}",
                self.lasso_penalty
            )));
        }
        Ok(())
    }
}

/// `[forecast]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastSection {
    /// Trading days to forecast
    pub days: usize,
    /// Seed of the forecast random stream
    pub seed: u64,
    /// Bar history to read; synthetic bars are used when absent
    pub csv_path: Option<PathBuf>,
    /// Bars withheld for the optional holdout evaluation
    pub holdout: Option<usize>,
}

impl Default for ForecastSection {
    fn default() -> Self {
        Self {
            days: 30,
            seed: 42,
            csv_path: None,
            holdout: None,
        }
    }
}

/// `[logging]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub forecast: ForecastSection,
    pub model: ModelParams,
    pub logging: LoggingSection,
}

impl ForecastConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ForecastConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings a run depends on, including any values set after parsing
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        if self.forecast.days == 0 {
            return Err(ForecastError::ConfigError(
                "forecast.days must be at least 1".to_string(),
            ));
        }
        if self.forecast.holdout == Some(0) {
            return Err(ForecastError::ConfigError(
                "forecast.holdout must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Read and parse a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }
}
