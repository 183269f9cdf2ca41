//! # Report
//!
//! Console rendering of a [`StudyReport`]. The study itself never prints; the
//! binary calls [`render`] once at the end.

use std::fmt::Write;

use prettytable::Table as PrettyTable;
use prettytable::format;
use prettytable::row;

use crate::stats::regression::StepwiseOutcome;
use crate::stats::stationarity::AdfResult;
use crate::study::CointegrationVerdict;
use crate::study::StationarityReport;
use crate::study::StationarityVerdict;
use crate::study::StudyReport;

/// Render the three study sections as text tables.
pub fn render(report: &StudyReport) -> String {
  let mut out = String::new();

  let _ = writeln!(out, "1. Stepwise OLS");
  out.push_str(&render_selection(&report.selection));
  out.push('\n');

  let _ = writeln!(out, "2. ADF test");
  out.push_str(&render_stationarity(&report.stationarity));
  out.push('\n');

  let _ = writeln!(out, "3. Cointegration test");
  out.push_str(&render_cointegration(&report.cointegration));
  out
}

fn new_table() -> PrettyTable {
  let mut table = PrettyTable::new();
  table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
  table
}

pub fn render_selection(selection: &StepwiseOutcome) -> String {
  let mut rounds = new_table();
  rounds.set_titles(row!["round", "best candidate", "adj. R²", "p-value", "accepted"]);
  for (i, round) in selection.rounds.iter().enumerate() {
    let best = round.best();
    rounds.add_row(row![
      i + 1,
      best.name,
      format!("{:.6}", best.rsquared_adj),
      format!("{:.4e}", best.p_value),
      if round.accepted { "yes" } else { "no" }
    ]);
  }

  let model = &selection.model;
  let mut params = new_table();
  params.set_titles(row!["term", "coef", "std err", "t", "P>|t|"]);
  for p in &model.params {
    params.add_row(row![
      p.name,
      format!("{:.6}", p.coefficient),
      format!("{:.6}", p.std_err),
      format!("{:.3}", p.t_value),
      format!("{:.4}", p.p_value)
    ]);
  }

  format!(
    "{rounds}\nModel: {}\nR²: {:.6}  adj. R²: {:.6}  nobs: {}\n{params}",
    model.formula, model.rsquared, model.rsquared_adj, model.nobs
  )
}

fn adf_table(result: &AdfResult) -> PrettyTable {
  let mut table = new_table();
  table.add_row(row!["ADF statistic", format!("{:.6}", result.statistic)]);
  table.add_row(row!["p-value", format!("{:.6}", result.p_value)]);
  table.add_row(row!["lags used", result.used_lags]);
  table.add_row(row!["observations", result.nobs]);
  for (label, value) in result.critical_values.labelled() {
    table.add_row(row![format!("critical value {label}"), format!("{value:.6}")]);
  }
  table
}

pub fn render_stationarity(report: &StationarityReport) -> String {
  if report.is_empty() {
    return "No regressors selected.\n".to_string();
  }

  let mut out = String::new();
  for (name, verdict) in &report.entries {
    match verdict {
      StationarityVerdict::Level(result) => {
        let _ = writeln!(out, "For {name}:");
        let _ = write!(out, "{}", adf_table(result));
        let _ = writeln!(
          out,
          "Reject the null hypothesis: {name} has no unit root and passes the ADF test.\n"
        );
      }
      StationarityVerdict::Differenced { order, result } => {
        let _ = writeln!(out, "For {name}.diff({order}):");
        let _ = write!(out, "{}", adf_table(result));
        let _ = writeln!(
          out,
          "Reject the null hypothesis: {name} has no unit root after differencing and passes the ADF test.\n"
        );
      }
      StationarityVerdict::Failed { .. } => {
        let _ = writeln!(out, "For {name}:");
        let _ = writeln!(out, "{name} fails the ADF test.\n");
      }
    }
  }
  out
}

pub fn render_cointegration(verdict: &CointegrationVerdict) -> String {
  let mut out = adf_table(&verdict.result).to_string();
  if verdict.cointegrated {
    out.push_str("Reject the null hypothesis: the residual has no unit root and passes the cointegration test.\n");
  } else {
    out.push_str("The residual has a unit root and fails the cointegration test.\n");
  }
  out
}

#[cfg(test)]
mod tests {
  use super::render_cointegration;
  use super::render_stationarity;
  use crate::stats::stationarity::AdfResult;
  use crate::stats::stationarity::CriticalValues;
  use crate::study::CointegrationVerdict;
  use crate::study::StationarityReport;
  use crate::study::StationarityVerdict;

  fn result() -> AdfResult {
    AdfResult {
      statistic: -4.2,
      p_value: 0.0007,
      used_lags: 2,
      nobs: 97,
      critical_values: CriticalValues {
        one_percent: -3.5,
        five_percent: -2.89,
        ten_percent: -2.58,
      },
      ic_best: Some(310.0),
    }
  }

  #[test]
  fn stationarity_section_names_difference_order() {
    let report = StationarityReport {
      entries: vec![
        ("x1".into(), StationarityVerdict::Level(result())),
        (
          "x2".into(),
          StationarityVerdict::Differenced {
            order: 1,
            result: result(),
          },
        ),
        ("x3".into(), StationarityVerdict::Failed { last: result() }),
      ],
    };
    let text = render_stationarity(&report);
    assert!(text.contains("For x1:"));
    assert!(text.contains("For x2.diff(1):"));
    assert!(text.contains("x3 fails the ADF test."));
    assert!(text.contains("critical value 5%"));
  }

  #[test]
  fn empty_stationarity_report() {
    let text = render_stationarity(&StationarityReport::default());
    assert_eq!(text, "No regressors selected.\n");
  }

  #[test]
  fn cointegration_section_reports_verdict() {
    let pass = CointegrationVerdict::from_result(result(), 0.05);
    assert!(render_cointegration(&pass).contains("passes the cointegration test"));

    let fail = CointegrationVerdict::from_result(AdfResult { p_value: 0.4, ..result() }, 0.05);
    assert!(render_cointegration(&fail).contains("fails the cointegration test"));
  }
}
