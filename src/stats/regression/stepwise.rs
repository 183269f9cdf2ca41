use ordered_float::OrderedFloat;
use rayon::prelude::*;
use tracing::debug;
use tracing::info;

use super::formula::Formula;
use super::ols::FittedModel;
use super::ols::fit;
use crate::data::Table;
use crate::error::Result;
use crate::error::StudyError;

/// Configuration for forward stepwise selection.
#[derive(Debug, Clone, Copy)]
pub struct StepwiseConfig {
  /// A candidate is only admitted when its own p-value is at most this.
  pub significance: f64,
}

impl Default for StepwiseConfig {
  fn default() -> Self {
    Self { significance: 0.05 }
  }
}

/// Fit quality of `selected + candidate`.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
  pub name: String,
  pub rsquared_adj: f64,
  /// p-value of the candidate's own coefficient.
  pub p_value: f64,
}

impl CandidateScore {
  // NaN scores rank below everything else.
  fn rank_key(&self) -> (OrderedFloat<f64>, &str, OrderedFloat<f64>) {
    let score = if self.rsquared_adj.is_nan() {
      f64::NEG_INFINITY
    } else {
      self.rsquared_adj
    };
    (OrderedFloat(score), self.name.as_str(), OrderedFloat(self.p_value))
  }
}

/// One pass over the remaining candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRound {
  /// All scored candidates, ascending by `(score, name, p-value)`.
  pub scores: Vec<CandidateScore>,
  /// Formula before this round.
  pub base: Formula,
  pub accepted: bool,
}

impl SelectionRound {
  /// The candidate that won the round (last after sorting).
  pub fn best(&self) -> &CandidateScore {
    &self.scores[self.scores.len() - 1]
  }
}

/// Result of forward selection: the final model plus every round that led to it.
#[derive(Debug, Clone)]
pub struct StepwiseOutcome {
  pub model: FittedModel,
  pub rounds: Vec<SelectionRound>,
  /// Adjusted R² of the last accepted round (0.0 if none was accepted).
  pub score: f64,
}

/// Greedy forward selection on adjusted R² with a p-value gate.
///
/// Each round fits `response ~ selected + candidate + 1` for every remaining
/// candidate and keeps the best adjusted R². The winner is admitted only when
/// it strictly improves the current score and its own p-value is at most
/// `cfg.significance`; the first rejected round ends the search.
///
/// # Errors
/// [`StudyError::DegenerateFormula`] when `response` is not a column; any OLS
/// failure on a candidate fit.
pub fn forward_select(table: &Table, response: &str, cfg: &StepwiseConfig) -> Result<StepwiseOutcome> {
  if !table.contains(response) {
    return Err(StudyError::DegenerateFormula {
      response: response.to_string(),
    });
  }

  let mut remaining = table.candidates(response);
  let mut formula = Formula::new(response);
  let mut current_score = 0.0;
  let mut rounds = Vec::new();

  while !remaining.is_empty() {
    let mut scores = remaining
      .par_iter()
      .map(|candidate| score_candidate(table, &formula, candidate))
      .collect::<Result<Vec<_>>>()?;
    scores.sort_by(|a, b| a.rank_key().cmp(&b.rank_key()));

    let best = &scores[scores.len() - 1];
    let accepted = best.rsquared_adj > current_score && best.p_value <= cfg.significance;
    let winner = best.name.clone();

    if accepted {
      info!(
        candidate = %winner,
        rsquared_adj = best.rsquared_adj,
        p_value = best.p_value,
        "accepted regressor"
      );
      current_score = best.rsquared_adj;
    } else {
      debug!(
        candidate = %winner,
        rsquared_adj = best.rsquared_adj,
        p_value = best.p_value,
        current_score,
        "best candidate rejected, stopping"
      );
    }

    rounds.push(SelectionRound {
      scores,
      base: formula.clone(),
      accepted,
    });

    if !accepted {
      break;
    }
    remaining.retain(|name| *name != winner);
    formula = formula.with_term(winner);
  }

  let model = fit(&formula, table)?;
  info!(formula = %formula, rsquared_adj = model.rsquared_adj, "stepwise selection finished");

  Ok(StepwiseOutcome {
    model,
    rounds,
    score: current_score,
  })
}

fn score_candidate(table: &Table, base: &Formula, candidate: &str) -> Result<CandidateScore> {
  let model = match fit(&base.with_term(candidate), table) {
    Ok(model) => model,
    // an unidentified fit scores NaN and ranks last
    Err(StudyError::TooFewObservations { nobs, params }) => {
      debug!(candidate, nobs, params, "candidate fit has no residual degrees of freedom");
      return Ok(CandidateScore {
        name: candidate.to_string(),
        rsquared_adj: f64::NAN,
        p_value: f64::NAN,
      });
    }
    Err(err) => return Err(err),
  };
  // the candidate is always the last term of the trial formula
  let p_value = model.params.last().map_or(f64::NAN, |p| p.p_value);
  debug!(candidate, rsquared_adj = model.rsquared_adj, p_value, "scored candidate");

  Ok(CandidateScore {
    name: candidate.to_string(),
    rsquared_adj: model.rsquared_adj,
    p_value,
  })
}

#[cfg(test)]
mod tests {
  use rand::SeedableRng;
  use rand::rngs::StdRng;
  use rand_distr::Distribution;
  use rand_distr::Normal;
  use tracing_test::traced_test;

  use super::CandidateScore;
  use super::StepwiseConfig;
  use super::forward_select;
  use crate::data::Table;
  use crate::error::StudyError;
  use crate::stats::regression::fit;

  fn noise(rng: &mut StdRng, n: usize, sd: f64) -> Vec<f64> {
    let dist = Normal::new(0.0, sd).unwrap();
    (0..n).map(|_| dist.sample(rng)).collect()
  }

  fn linear_table(seed: u64) -> Table {
    let n = 120;
    let mut rng = StdRng::seed_from_u64(seed);
    let x1 = noise(&mut rng, n, 1.0);
    let x2 = noise(&mut rng, n, 1.0);
    let x3 = noise(&mut rng, n, 1.0);
    let e = noise(&mut rng, n, 0.5);
    let y = (0..n).map(|i| 1.0 + 3.0 * x1[i] - 2.0 * x2[i] + e[i]).collect();
    Table::new(vec![("y", y), ("x1", x1), ("x2", x2), ("x3", x3)]).unwrap()
  }

  #[test]
  fn picks_strongest_regressor_first() {
    let table = linear_table(7);
    let out = forward_select(&table, "y", &StepwiseConfig::default()).unwrap();

    assert_eq!(out.rounds[0].best().name, "x1");
    assert!(out.rounds[0].accepted);
    assert_eq!(out.rounds[1].best().name, "x2");
    assert!(out.rounds[1].accepted);

    let terms = out.model.formula.terms();
    assert_eq!(&terms[..2], &["x1".to_string(), "x2".to_string()]);
  }

  #[test]
  fn score_never_decreases() {
    let table = linear_table(11);
    let out = forward_select(&table, "y", &StepwiseConfig::default()).unwrap();

    let accepted: Vec<f64> = out
      .rounds
      .iter()
      .filter(|r| r.accepted)
      .map(|r| r.best().rsquared_adj)
      .collect();
    assert!(accepted.windows(2).all(|w| w[1] > w[0]));
    assert!(out.rounds.len() <= table.candidates("y").len());
    assert_eq!(out.score, *accepted.last().unwrap());
  }

  #[test]
  fn near_perfect_predictor_wins_round_one() {
    let n = 80;
    let mut rng = StdRng::seed_from_u64(3);
    let x = noise(&mut rng, n, 1.0);
    let a = noise(&mut rng, n, 1.0);
    let b = noise(&mut rng, n, 1.0);
    let e = noise(&mut rng, n, 1e-3);
    let y = (0..n).map(|i| 2.0 * x[i] + 0.3 * a[i] + e[i]).collect();
    let table = Table::new(vec![("a", a), ("y", y), ("b", b), ("perfect", x)]).unwrap();

    let out = forward_select(&table, "y", &StepwiseConfig::default()).unwrap();
    let first = out.rounds[0].best();
    assert_eq!(first.name, "perfect");
    assert!(first.p_value <= 0.05);
    assert!(out.rounds[0].accepted);
  }

  #[test]
  fn orthogonal_candidates_leave_intercept_only() {
    // both candidates are exactly orthogonal to y and to the constant
    let n = 40;
    let y: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
    let x1: Vec<f64> = (0..n).map(|i| if i % 4 < 2 { 1.0 } else { -1.0 }).collect();
    let x2: Vec<f64> = (0..n)
      .map(|i| if i % 4 == 0 || i % 4 == 3 { 1.0 } else { -1.0 })
      .collect();
    let table = Table::new(vec![("y", y), ("x1", x1), ("x2", x2)]).unwrap();

    let out = forward_select(&table, "y", &StepwiseConfig::default()).unwrap();
    assert_eq!(out.rounds.len(), 1);
    assert!(!out.rounds[0].accepted);
    assert_eq!(out.model.params.len(), 1);
    assert_eq!(out.model.regressors().count(), 0);
    assert_eq!(out.model.formula.to_string(), "y ~ 1");
    assert_eq!(out.score, 0.0);
  }

  #[test]
  fn significance_gate_blocks_improving_candidate() {
    let n = 100;
    let mut rng = StdRng::seed_from_u64(21);
    let x = noise(&mut rng, n, 1.0);
    let e = noise(&mut rng, n, 1.0);
    let y = (0..n).map(|i| 0.5 * x[i] + e[i]).collect();
    let table = Table::new(vec![("y", y), ("x", x)]).unwrap();

    let strict = StepwiseConfig { significance: 1e-12 };
    let out = forward_select(&table, "y", &strict).unwrap();
    let best = out.rounds[0].best();
    assert!(best.rsquared_adj > 0.0);
    assert!(best.p_value > 1e-12);
    assert!(!out.rounds[0].accepted);
    assert_eq!(out.model.params.len(), 1);
  }

  #[test]
  fn ties_resolve_to_last_name() {
    let mut scores = vec![
      CandidateScore {
        name: "b".into(),
        rsquared_adj: 0.5,
        p_value: 0.01,
      },
      CandidateScore {
        name: "c".into(),
        rsquared_adj: 0.5,
        p_value: 0.01,
      },
      CandidateScore {
        name: "a".into(),
        rsquared_adj: 0.5,
        p_value: 0.01,
      },
      CandidateScore {
        name: "z".into(),
        rsquared_adj: f64::NAN,
        p_value: 0.01,
      },
    ];
    scores.sort_by(|a, b| a.rank_key().cmp(&b.rank_key()));
    let names: Vec<&str> = scores.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["z", "a", "b", "c"]);
  }

  #[test]
  fn refit_reproduces_selected_model() {
    let table = linear_table(5);
    let out = forward_select(&table, "y", &StepwiseConfig::default()).unwrap();
    let refit = fit(&out.model.formula, &table).unwrap();

    assert_eq!(refit.coefficients(), out.model.coefficients());
    let p: Vec<f64> = refit.params.iter().map(|p| p.p_value).collect();
    let q: Vec<f64> = out.model.params.iter().map(|p| p.p_value).collect();
    assert_eq!(p, q);
  }

  #[test]
  fn collinear_candidate_is_not_added() {
    let n = 100;
    let mut rng = StdRng::seed_from_u64(41);
    let x1 = noise(&mut rng, n, 1.0);
    let e = noise(&mut rng, n, 0.1);
    let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v + 1.0).collect();
    let y = (0..n).map(|i| 1.0 + 3.0 * x1[i] + e[i]).collect();
    let table = Table::new(vec![("y", y), ("x1", x1), ("x2", x2)]).unwrap();

    let out = forward_select(&table, "y", &StepwiseConfig::default()).unwrap();
    let first = out.rounds[0].best().name.clone();
    assert!(out.rounds[0].accepted);

    // the duplicate reproduces the fit and only pays the extra parameter
    let second = out.rounds[1].best();
    assert_ne!(second.name, first);
    assert!(!out.rounds[1].accepted);
    assert!(second.rsquared_adj < out.score);
    assert!(second.rsquared_adj > out.score - 1e-3);
    assert_eq!(out.model.formula.terms(), &[first]);
  }

  #[test]
  fn unidentified_candidates_end_selection() {
    let table = Table::new(vec![
      ("y", vec![1.0, 2.0]),
      ("a", vec![0.0, 1.0]),
      ("b", vec![3.0, 1.0]),
    ])
    .unwrap();
    let out = forward_select(&table, "y", &StepwiseConfig::default()).unwrap();

    assert_eq!(out.rounds.len(), 1);
    assert!(!out.rounds[0].accepted);
    assert!(out.rounds[0].scores.iter().all(|s| s.rsquared_adj.is_nan()));
    assert_eq!(out.model.params.len(), 1);
    assert_eq!(out.model.formula.to_string(), "y ~ 1");
  }

  #[test]
  fn missing_response_fails_fast() {
    let table = linear_table(1);
    let err = forward_select(&table, "target", &StepwiseConfig::default()).unwrap_err();
    assert!(matches!(err, StudyError::DegenerateFormula { response } if response == "target"));
  }

  #[traced_test]
  #[test]
  fn logs_accepted_regressors() {
    let table = linear_table(9);
    forward_select(&table, "y", &StepwiseConfig::default()).unwrap();
    assert!(logs_contain("accepted regressor"));
    assert!(logs_contain("stepwise selection finished"));
  }
}
