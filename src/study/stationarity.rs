use impl_new_derive::ImplNew;
use tracing::debug;
use tracing::info;

use crate::data::Table;
use crate::error::Result;
use crate::stats::regression::FittedModel;
use crate::stats::stationarity::AdfConfig;
use crate::stats::stationarity::AdfResult;
use crate::stats::stationarity::adf_test;
use crate::stats::stationarity::difference_n;

/// Difference orders tried after the level test fails, in order.
pub const DIFFERENCE_ORDERS: [usize; 2] = [1, 2];

/// Outcome of the level-then-difference ADF escalation for one regressor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StationarityVerdict {
  /// The raw series passed.
  Level(AdfResult),
  /// The `order`-th difference passed.
  Differenced { order: usize, result: AdfResult },
  /// Neither the level nor any difference passed; `last` is the final attempt.
  Failed { last: AdfResult },
}

impl StationarityVerdict {
  pub fn is_stationary(&self) -> bool {
    !matches!(self, StationarityVerdict::Failed { .. })
  }

  /// Difference order that passed, `Some(0)` for the level.
  pub fn order(&self) -> Option<usize> {
    match self {
      StationarityVerdict::Level(_) => Some(0),
      StationarityVerdict::Differenced { order, .. } => Some(*order),
      StationarityVerdict::Failed { .. } => None,
    }
  }

  /// The ADF run that produced the verdict.
  pub fn result(&self) -> &AdfResult {
    match self {
      StationarityVerdict::Level(result)
      | StationarityVerdict::Differenced { result, .. }
      | StationarityVerdict::Failed { last: result } => result,
    }
  }
}

/// Per-regressor verdicts, in model parameter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationarityReport {
  pub entries: Vec<(String, StationarityVerdict)>,
}

impl StationarityReport {
  pub fn get(&self, name: &str) -> Option<&StationarityVerdict> {
    self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Unit-root screening of a fitted model's regressors.
///
/// A series passes when its ADF statistic is at or below the 5% critical
/// value. This is a statistic comparison, not a p-value comparison.
#[derive(ImplNew, Debug, Clone, Copy)]
pub struct StationarityTester {
  pub config: AdfConfig,
}

impl Default for StationarityTester {
  fn default() -> Self {
    Self::new(AdfConfig::study())
  }
}

impl StationarityTester {
  /// Test every regressor of `model` (intercept excluded) on its `table` column.
  pub fn test_all(&self, table: &Table, model: &FittedModel) -> Result<StationarityReport> {
    let mut entries = Vec::new();
    for name in model.regressors() {
      let verdict = self.test_series(table.column(name)?)?;
      info!(regressor = name, order = ?verdict.order(), "stationarity verdict");
      entries.push((name.to_string(), verdict));
    }
    Ok(StationarityReport { entries })
  }

  /// Level test, then the first and second differences, stopping at the first pass.
  pub fn test_series(&self, series: &[f64]) -> Result<StationarityVerdict> {
    let level = adf_test(series, self.config)?;
    if level.below_five_percent_critical() {
      return Ok(StationarityVerdict::Level(level));
    }

    let mut last = level;
    for order in DIFFERENCE_ORDERS {
      let result = adf_test(&difference_n(series, order), self.config)?;
      debug!(order, statistic = result.statistic, "differenced adf");
      if result.below_five_percent_critical() {
        return Ok(StationarityVerdict::Differenced { order, result });
      }
      last = result;
    }

    Ok(StationarityVerdict::Failed { last })
  }
}
