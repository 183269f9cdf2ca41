use nalgebra::DMatrix;
use nalgebra::DVector;
use statrs::function::erf::erfc;

use crate::error::Result;
use crate::error::StudyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeterministicTerm {
  None,
  Constant,
  ConstantTrend,
}

impl DeterministicTerm {
  /// Number of deterministic regressors in the test regression.
  pub fn count(self) -> usize {
    match self {
      DeterministicTerm::None => 0,
      DeterministicTerm::Constant => 1,
      DeterministicTerm::ConstantTrend => 2,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LagSelection {
  Fixed(usize),
  Aic,
  Bic,
  TStat,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
  pub one_percent: f64,
  pub five_percent: f64,
  pub ten_percent: f64,
}

impl CriticalValues {
  pub fn value_at(self, alpha: f64) -> f64 {
    if alpha <= 0.01 {
      self.one_percent
    } else if alpha <= 0.05 {
      self.five_percent
    } else {
      self.ten_percent
    }
  }

  /// `("1%", v), ("5%", v), ("10%", v)`.
  pub fn labelled(self) -> [(&'static str, f64); 3] {
    [
      ("1%", self.one_percent),
      ("5%", self.five_percent),
      ("10%", self.ten_percent),
    ]
  }
}

#[derive(Debug, Clone)]
pub struct OlsResult {
  pub beta: Vec<f64>,
  pub std_err: Vec<f64>,
  pub sse: f64,
  pub nobs: usize,
  pub k: usize,
}

#[derive(Debug, Clone)]
pub struct AdfFit {
  pub lag: usize,
  pub statistic: f64,
  pub nobs: usize,
}

pub fn validate_series(y: &[f64]) -> Result<()> {
  if y.iter().all(|v| v.is_finite()) {
    Ok(())
  } else {
    Err(StudyError::NonFiniteSeries)
  }
}

pub fn difference(y: &[f64]) -> Vec<f64> {
  y.windows(2).map(|w| w[1] - w[0]).collect()
}

/// `order`-th difference; the first `order` (undefined) values are dropped.
pub fn difference_n(y: &[f64], order: usize) -> Vec<f64> {
  (0..order).fold(y.to_vec(), |acc, _| difference(&acc))
}

pub fn schwert_max_lags(n: usize) -> usize {
  if n <= 1 {
    return 0;
  }
  (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize
}

/// Largest lag order the sample supports: `n/2 - ntrend - 1`.
pub fn max_supported_lag(n: usize, det: DeterministicTerm) -> Option<usize> {
  (n / 2).checked_sub(det.count() + 1)
}

// MacKinnon (2010) response surface, one variable: [c0, c1, c2, c3] per level.
const TAU_N_2010: [[f64; 4]; 3] = [
  [-2.56574, -2.2358, -3.627, 0.0],
  [-1.94100, -0.2686, -3.365, 31.223],
  [-1.61682, 0.2656, -2.714, 25.364],
];
const TAU_C_2010: [[f64; 4]; 3] = [
  [-3.43035, -6.5393, -16.786, -79.433],
  [-2.86154, -2.8903, -4.234, -40.040],
  [-2.56677, -1.5384, -2.809, 0.0],
];
const TAU_CT_2010: [[f64; 4]; 3] = [
  [-3.95877, -9.0531, -28.428, -134.155],
  [-3.41049, -4.3904, -9.036, -45.374],
  [-3.12705, -2.5856, -3.925, -22.380],
];

/// Finite-sample critical values for `nobs` regression observations.
pub fn adf_critical_values(det: DeterministicTerm, nobs: usize) -> CriticalValues {
  let table = match det {
    DeterministicTerm::None => &TAU_N_2010,
    DeterministicTerm::Constant => &TAU_C_2010,
    DeterministicTerm::ConstantTrend => &TAU_CT_2010,
  };
  let inv = 1.0 / nobs as f64;
  let surface = |c: &[f64; 4]| c[0] + c[1] * inv + c[2] * inv * inv + c[3] * inv * inv * inv;

  CriticalValues {
    one_percent: surface(&table[0]),
    five_percent: surface(&table[1]),
    ten_percent: surface(&table[2]),
  }
}

struct PValueSurface {
  max_stat: f64,
  min_stat: f64,
  star_stat: f64,
  small_p: [f64; 3],
  large_p: [f64; 4],
}

// MacKinnon (1994) approximate p-value coefficients, one variable.
fn p_value_surface(det: DeterministicTerm) -> PValueSurface {
  match det {
    DeterministicTerm::None => PValueSurface {
      max_stat: f64::INFINITY,
      min_stat: -19.04,
      star_stat: -1.04,
      small_p: [0.6344, 1.2378, 0.032496],
      large_p: [0.4797, 0.93557, -0.06999, 0.033066],
    },
    DeterministicTerm::Constant => PValueSurface {
      max_stat: 2.74,
      min_stat: -18.83,
      star_stat: -1.61,
      small_p: [2.1659, 1.4412, 0.038269],
      large_p: [1.7339, 0.93202, -0.12745, -0.010368],
    },
    DeterministicTerm::ConstantTrend => PValueSurface {
      max_stat: 0.7,
      min_stat: -16.18,
      star_stat: -2.89,
      small_p: [3.2512, 1.6047, 0.049588],
      large_p: [2.5261, 0.61654, -0.37956, -0.060285],
    },
  }
}

/// Approximate p-value of an ADF statistic.
pub fn mackinnon_p_value(statistic: f64, det: DeterministicTerm) -> f64 {
  if statistic.is_nan() {
    return f64::NAN;
  }

  let surface = p_value_surface(det);
  if statistic > surface.max_stat {
    return 1.0;
  }
  if statistic < surface.min_stat {
    return 0.0;
  }

  let coefs: &[f64] = if statistic <= surface.star_stat {
    &surface.small_p
  } else {
    &surface.large_p
  };
  let z = coefs.iter().rev().fold(0.0, |acc, c| acc * statistic + c);

  // standard normal cdf
  0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

pub fn ols(y: &[f64], x: &[Vec<f64>]) -> Result<OlsResult> {
  let n = y.len();
  let k = x.first().map_or(0, Vec::len);
  if n <= k {
    return Err(StudyError::TooFewObservations { nobs: n, params: k });
  }

  let mut flat_x = Vec::with_capacity(n * k);
  for row in x {
    flat_x.extend_from_slice(row);
  }

  let x_mat = DMatrix::from_row_slice(n, k, &flat_x);
  let y_vec = DVector::from_row_slice(y);

  let xtx = x_mat.transpose() * &x_mat;
  let Some(xtx_inv) = xtx.try_inverse() else {
    return Err(StudyError::SingularDesign);
  };

  let beta = &xtx_inv * x_mat.transpose() * &y_vec;
  let residuals = y_vec - &x_mat * &beta;

  let sse = residuals.iter().map(|u| u * u).sum::<f64>();
  let sigma2 = (sse / (n - k) as f64).max(0.0);

  let cov = xtx_inv * sigma2;
  let std_err = (0..k).map(|i| cov[(i, i)].max(0.0).sqrt()).collect();

  Ok(OlsResult {
    beta: beta.iter().copied().collect(),
    std_err,
    sse,
    nobs: n,
    k,
  })
}

/// ADF regression rows for `t` in `start..dy.len()`, `start >= lags`.
///
/// Column layout: deterministic terms, `y_{t-1}`, then `Δy_{t-1} .. Δy_{t-lags}`.
fn build_adf_design(
  y: &[f64],
  dy: &[f64],
  lags: usize,
  start: usize,
  det: DeterministicTerm,
) -> (Vec<f64>, Vec<Vec<f64>>, usize) {
  let n_dy = dy.len();
  let mut lhs = Vec::with_capacity(n_dy.saturating_sub(start));
  let mut rhs = Vec::with_capacity(n_dy.saturating_sub(start));

  for t in start..n_dy {
    lhs.push(dy[t]);

    let mut row = Vec::with_capacity(det.count() + 1 + lags);
    match det {
      DeterministicTerm::None => {}
      DeterministicTerm::Constant => row.push(1.0),
      DeterministicTerm::ConstantTrend => {
        row.push(1.0);
        row.push((t + 1) as f64);
      }
    }

    // dy-index t corresponds to original time t+1, so y[t] is the lagged level.
    row.push(y[t]);

    for i in 1..=lags {
      row.push(dy[t - i]);
    }

    rhs.push(row);
  }

  (lhs, rhs, det.count())
}

/// Fit the ADF regression with `lags` augmentation terms on its full sample.
pub fn fit_adf(y: &[f64], lags: usize, det: DeterministicTerm) -> Result<AdfFit> {
  let dy = difference(y);
  let (lhs, rhs, gamma_index) = build_adf_design(y, &dy, lags, lags, det);
  let fit = ols(&lhs, &rhs)?;

  let gamma = fit.beta[gamma_index];
  let se = fit.std_err[gamma_index];
  let statistic = if se > 0.0 { gamma / se } else { f64::NAN };

  Ok(AdfFit {
    lag: lags,
    statistic,
    nobs: fit.nobs,
  })
}

/// Gaussian-likelihood AIC of an OLS fit.
pub fn aic_from_sse(sse: f64, nobs: usize, k: usize) -> f64 {
  let n = nobs as f64;
  n * ((2.0 * std::f64::consts::PI).ln() + (sse / n).ln() + 1.0) + 2.0 * k as f64
}

/// Gaussian-likelihood BIC of an OLS fit.
pub fn bic_from_sse(sse: f64, nobs: usize, k: usize) -> f64 {
  let n = nobs as f64;
  n * ((2.0 * std::f64::consts::PI).ln() + (sse / n).ln() + 1.0) + (k as f64) * n.ln()
}

/// Pick the augmentation lag in `0..=max_lags`.
///
/// Every order is fitted on the same sample (trimmed by `max_lags`) so the
/// information criteria are comparable. Returns the lag and, for AIC/BIC, the
/// winning criterion value.
pub fn choose_lag_for_adf(
  y: &[f64],
  det: DeterministicTerm,
  lag_selection: LagSelection,
  max_lags: usize,
) -> Result<(usize, Option<f64>)> {
  let criterion: fn(f64, usize, usize) -> f64 = match lag_selection {
    LagSelection::Fixed(p) => return Ok((p, None)),
    LagSelection::TStat => return Ok((t_stat_lag(y, det, max_lags)?, None)),
    LagSelection::Aic => aic_from_sse,
    LagSelection::Bic => bic_from_sse,
  };

  let dy = difference(y);
  let mut best_lag = 0usize;
  let mut best_score = f64::INFINITY;

  for lag in 0..=max_lags {
    let (lhs, rhs, _) = build_adf_design(y, &dy, lag, max_lags, det);
    let fit = ols(&lhs, &rhs)?;
    let ic = criterion(fit.sse, fit.nobs, fit.k);

    // strict `<` keeps the smaller lag on ties
    if ic < best_score {
      best_score = ic;
      best_lag = lag;
    }
  }

  Ok((best_lag, Some(best_score)))
}

/// General-to-specific search: walk down from `max_lags` and stop at the first
/// order whose last lag is significant at the two-sided 10% level.
fn t_stat_lag(y: &[f64], det: DeterministicTerm, max_lags: usize) -> Result<usize> {
  let dy = difference(y);

  for lag in (1..=max_lags).rev() {
    let (lhs, rhs, _) = build_adf_design(y, &dy, lag, max_lags, det);
    let fit = ols(&lhs, &rhs)?;

    let idx = fit.k - 1;
    let se = fit.std_err[idx];
    if se > 0.0 && (fit.beta[idx] / se).abs() >= 1.644_853_626_951_472_2 {
      return Ok(lag);
    }
  }

  Ok(0)
}
