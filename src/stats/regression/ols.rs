use nalgebra::DMatrix;
use nalgebra::DVector;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::StudentsT;

use super::formula::Formula;
use super::formula::INTERCEPT;
use crate::data::Table;
use crate::error::Result;
use crate::error::StudyError;

const SVD_MAX_ITER: usize = 1_000;
// Singular values below this fraction of the largest are treated as zero.
const RANK_RTOL: f64 = 1e-10;

/// Estimate and inference for one regression term.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
  pub name: String,
  pub coefficient: f64,
  pub std_err: f64,
  pub t_value: f64,
  /// Two-sided p-value under Student-t with `df_resid` degrees of freedom.
  pub p_value: f64,
}

/// Ordinary least-squares fit of a [`Formula`] against a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
  pub formula: Formula,
  /// Intercept first, then regressors in formula order.
  pub params: Vec<Parameter>,
  pub rsquared: f64,
  pub rsquared_adj: f64,
  pub residuals: Vec<f64>,
  pub fitted_values: Vec<f64>,
  pub ssr: f64,
  pub nobs: usize,
  pub df_resid: usize,
}

impl FittedModel {
  pub fn param(&self, name: &str) -> Option<&Parameter> {
    self.params.iter().find(|p| p.name == name)
  }

  pub fn p_value(&self, name: &str) -> Option<f64> {
    self.param(name).map(|p| p.p_value)
  }

  pub fn coefficients(&self) -> Vec<f64> {
    self.params.iter().map(|p| p.coefficient).collect()
  }

  /// Parameter names with the intercept removed.
  pub fn regressors(&self) -> impl Iterator<Item = &str> {
    self
      .params
      .iter()
      .map(|p| p.name.as_str())
      .filter(|name| *name != INTERCEPT)
  }
}

/// Fit `formula` by OLS with an intercept.
pub fn fit(formula: &Formula, table: &Table) -> Result<FittedModel> {
  let y = table.column(formula.response())?;
  let regressors = formula
    .terms()
    .iter()
    .map(|name| table.column(name))
    .collect::<Result<Vec<_>>>()?;

  let n = table.nrows();
  let k = 1 + regressors.len();
  if n <= k {
    return Err(StudyError::TooFewObservations { nobs: n, params: k });
  }

  let x = DMatrix::from_fn(n, k, |i, j| if j == 0 { 1.0 } else { regressors[j - 1][i] });
  let y_vec = DVector::from_column_slice(y);

  // Minimum-norm solve: singular values below the rank tolerance are dropped,
  // so an exactly collinear column leaves the fitted values unchanged.
  let pinv = x
    .clone()
    .try_svd(true, true, f64::EPSILON, SVD_MAX_ITER)
    .and_then(|svd| {
      let tol = svd.singular_values.max() * RANK_RTOL;
      svd.pseudo_inverse(tol).ok()
    })
    .or_else(|| {
      (x.transpose() * &x)
        .try_inverse()
        .map(|inv| inv * x.transpose())
    })
    .ok_or(StudyError::SingularDesign)?;
  // (X'X)^+ = X^+ (X^+)'
  let xtx_inv = &pinv * pinv.transpose();

  let beta = &pinv * &y_vec;
  let fitted = &x * &beta;
  let resid = &y_vec - &fitted;

  let ssr = resid.iter().map(|u| u * u).sum::<f64>();
  let mean_y = y.iter().sum::<f64>() / n as f64;
  let centered_tss = y.iter().map(|v| (v - mean_y).powi(2)).sum::<f64>();
  let df_resid = n - k;
  let rsquared = 1.0 - ssr / centered_tss;
  let rsquared_adj = 1.0 - (n - 1) as f64 / df_resid as f64 * (1.0 - rsquared);

  let sigma2 = ssr / df_resid as f64;
  let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
    .map_err(|_| StudyError::TooFewObservations { nobs: n, params: k })?;

  let names = std::iter::once(INTERCEPT).chain(formula.terms().iter().map(String::as_str));
  let params = names
    .enumerate()
    .map(|(j, name)| {
      let coefficient = beta[j];
      let std_err = (xtx_inv[(j, j)] * sigma2).max(0.0).sqrt();
      let t_value = coefficient / std_err;
      let p_value = (2.0 * t_dist.sf(t_value.abs())).clamp(0.0, 1.0);
      Parameter {
        name: name.to_string(),
        coefficient,
        std_err,
        t_value,
        p_value,
      }
    })
    .collect();

  Ok(FittedModel {
    formula: formula.clone(),
    params,
    rsquared,
    rsquared_adj,
    residuals: resid.iter().copied().collect(),
    fitted_values: fitted.iter().copied().collect(),
    ssr,
    nobs: n,
    df_resid,
  })
}
