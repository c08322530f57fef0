//! Statistical models behind the forecaster
//!
//! - [`lasso`]: L1-penalized linear regression fitted by coordinate descent
//! - [`ensemble`]: bootstrap ensemble over the regression residuals

pub mod ensemble;
pub mod lasso;

pub use ensemble::{EnsembleSummary, ResidualBootstrapEnsemble};
pub use lasso::{FeatureImportance, LassoFit, LassoRegression};
