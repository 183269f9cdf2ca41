use impl_new_derive::ImplNew;
use tracing::info;

use crate::error::Result;
use crate::stats::regression::FittedModel;
use crate::stats::stationarity::AdfConfig;
use crate::stats::stationarity::AdfResult;
use crate::stats::stationarity::adf_test;

/// ADF outcome on the regression residual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CointegrationVerdict {
  pub result: AdfResult,
  /// `true` when the residual has no unit root.
  pub cointegrated: bool,
}

impl CointegrationVerdict {
  /// Decide on the p-value alone: `p_value <= significance`.
  pub fn from_result(result: AdfResult, significance: f64) -> Self {
    Self {
      result,
      cointegrated: result.p_value <= significance,
    }
  }
}

/// Residual-based cointegration check.
///
/// Unlike [`StationarityTester`](super::stationarity::StationarityTester),
/// the verdict here follows the ADF p-value, not the critical value.
#[derive(ImplNew, Debug, Clone, Copy)]
pub struct CointegrationTester {
  pub config: AdfConfig,
  pub significance: f64,
}

impl Default for CointegrationTester {
  fn default() -> Self {
    Self::new(AdfConfig::study(), 0.05)
  }
}

impl CointegrationTester {
  pub fn test_residuals(&self, model: &FittedModel) -> Result<CointegrationVerdict> {
    let result = adf_test(&model.residuals, self.config)?;
    let verdict = CointegrationVerdict::from_result(result, self.significance);
    info!(
      statistic = result.statistic,
      p_value = result.p_value,
      cointegrated = verdict.cointegrated,
      "cointegration verdict"
    );
    Ok(verdict)
  }
}
