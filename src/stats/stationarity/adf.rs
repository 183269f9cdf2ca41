use tracing::debug;

use super::common::CriticalValues;
use super::common::DeterministicTerm;
use super::common::LagSelection;
use super::common::adf_critical_values;
use super::common::choose_lag_for_adf;
use super::common::fit_adf;
use super::common::mackinnon_p_value;
use super::common::max_supported_lag;
use super::common::schwert_max_lags;
use super::common::validate_series;
use crate::error::Result;
use crate::error::StudyError;

/// Configuration for the Augmented Dickey-Fuller unit-root test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfConfig {
  /// Deterministic terms included in the test regression.
  pub deterministic: DeterministicTerm,
  /// Lag-order selection strategy.
  pub lag_selection: LagSelection,
  /// Maximum lag considered by automatic lag selection.
  /// `None` uses the Schwert rule `12 (n/100)^{1/4}`.
  pub max_lags: Option<usize>,
}

impl Default for AdfConfig {
  fn default() -> Self {
    Self {
      deterministic: DeterministicTerm::Constant,
      lag_selection: LagSelection::Aic,
      max_lags: None,
    }
  }
}

impl AdfConfig {
  /// Constant-only regression, AIC lag selection, at most 9 lags.
  pub fn study() -> Self {
    Self {
      max_lags: Some(9),
      ..Self::default()
    }
  }
}

/// Result of the Augmented Dickey-Fuller test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
  /// ADF t-statistic for the lagged level coefficient.
  pub statistic: f64,
  /// MacKinnon approximate p-value.
  pub p_value: f64,
  /// Selected lag order.
  pub used_lags: usize,
  /// Number of regression observations used by the fitted model.
  pub nobs: usize,
  /// Critical values at 1%, 5%, 10% levels.
  pub critical_values: CriticalValues,
  /// Best information criterion when lags were chosen by AIC or BIC.
  pub ic_best: Option<f64>,
}

impl AdfResult {
  /// `statistic <= 5% critical value`.
  pub fn below_five_percent_critical(&self) -> bool {
    self.statistic <= self.critical_values.value_at(0.05)
  }
}

/// Augmented Dickey-Fuller unit-root test.
///
/// # Errors
/// [`StudyError::InsufficientData`] when the sample cannot carry the lag
/// structure (`max_lag > n/2 - ntrend - 1`), [`StudyError::NonFiniteSeries`]
/// on NaN or infinite input, and OLS failures from degenerate series.
pub fn adf_test(y: &[f64], cfg: AdfConfig) -> Result<AdfResult> {
  validate_series(y)?;

  let n = y.len();
  let requested = match cfg.lag_selection {
    LagSelection::Fixed(p) => Some(p),
    _ => cfg.max_lags,
  };

  let supported = max_supported_lag(n, cfg.deterministic);
  let max_lags = match (requested, supported) {
    (Some(p), Some(cap)) if p <= cap => p,
    (None, Some(cap)) => schwert_max_lags(n).min(cap),
    (requested, _) => {
      let lag = requested.unwrap_or(0);
      return Err(StudyError::InsufficientData {
        len: n,
        required: 2 * (lag + cfg.deterministic.count() + 1),
      });
    }
  };

  let (used_lags, ic_best) = choose_lag_for_adf(y, cfg.deterministic, cfg.lag_selection, max_lags)?;
  let fit = fit_adf(y, used_lags, cfg.deterministic)?;
  let p_value = mackinnon_p_value(fit.statistic, cfg.deterministic);
  let critical_values = adf_critical_values(cfg.deterministic, fit.nobs);

  debug!(
    n,
    used_lags = fit.lag,
    statistic = fit.statistic,
    p_value,
    "adf test"
  );

  Ok(AdfResult {
    statistic: fit.statistic,
    p_value,
    used_lags,
    nobs: fit.nobs,
    critical_values,
    ic_best,
  })
}
