//! # Study
//!
//! $$
//! y_t=\alpha+\sum_{j\in S}\beta_j x_{j,t}+u_t,\qquad u_t\sim I(0)\ \Rightarrow\ \text{cointegration}
//! $$
//!
//! The three-step analysis: forward stepwise selection, unit-root screening
//! of the selected regressors, and an ADF test on the regression residual.

pub mod cointegration;
pub mod stationarity;

use tracing::info;

pub use cointegration::CointegrationTester;
pub use cointegration::CointegrationVerdict;
pub use stationarity::StationarityReport;
pub use stationarity::StationarityTester;
pub use stationarity::StationarityVerdict;

use crate::data::Table;
use crate::error::Result;
use crate::stats::regression::StepwiseConfig;
use crate::stats::regression::StepwiseOutcome;
use crate::stats::regression::forward_select;
use crate::stats::stationarity::AdfConfig;

/// Settings for a full study run.
#[derive(Debug, Clone)]
pub struct StudyConfig {
  /// Name of the response column.
  pub response: String,
  pub stepwise: StepwiseConfig,
  /// ADF settings shared by both testers.
  pub adf: AdfConfig,
  /// p-value threshold for the residual test.
  pub cointegration_significance: f64,
}

impl Default for StudyConfig {
  fn default() -> Self {
    Self {
      response: "y".to_string(),
      stepwise: StepwiseConfig::default(),
      adf: AdfConfig::study(),
      cointegration_significance: 0.05,
    }
  }
}

/// Everything the study produced, ready for presentation.
#[derive(Debug, Clone)]
pub struct StudyReport {
  pub selection: StepwiseOutcome,
  pub stationarity: StationarityReport,
  pub cointegration: CointegrationVerdict,
}

/// Run selection, regressor screening and the residual test in sequence.
pub fn run(table: &Table, cfg: &StudyConfig) -> Result<StudyReport> {
  info!(response = %cfg.response, candidates = table.ncols().saturating_sub(1), "stepwise OLS");
  let selection = forward_select(table, &cfg.response, &cfg.stepwise)?;

  info!(formula = %selection.model.formula, "ADF screening of regressors");
  let stationarity = StationarityTester::new(cfg.adf).test_all(table, &selection.model)?;

  info!("residual cointegration test");
  let cointegration = CointegrationTester::new(cfg.adf, cfg.cointegration_significance)
    .test_residuals(&selection.model)?;

  Ok(StudyReport {
    selection,
    stationarity,
    cointegration,
  })
}
