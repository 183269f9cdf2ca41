use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use stepwise_coint::StudyConfig;
use stepwise_coint::data::read_csv;
use stepwise_coint::report::render;
use stepwise_coint::stats::regression::StepwiseConfig;
use stepwise_coint::stats::stationarity::AdfConfig;
use stepwise_coint::study;

#[derive(Parser, Debug)]
#[command(author, version, about = "Stepwise OLS with ADF and cointegration tests")]
struct Args {
  /// Headed CSV file, one column per variable
  input: PathBuf,

  /// Response column
  #[arg(long, default_value = "y")]
  response: String,

  /// p-value gate for stepwise selection and the residual test
  #[arg(long, default_value = "0.05")]
  significance: f64,

  /// Maximum ADF augmentation lag
  #[arg(long, default_value = "9")]
  max_lag: usize,

  /// Log every candidate fit and ADF run
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let args = Args::parse();

  tracing_subscriber::fmt()
    .with_max_level(if args.verbose {
      tracing::Level::DEBUG
    } else {
      tracing::Level::INFO
    })
    .with_writer(std::io::stderr)
    .init();

  let table = read_csv(&args.input)
    .with_context(|| format!("failed to load {}", args.input.display()))?;

  let cfg = StudyConfig {
    response: args.response,
    stepwise: StepwiseConfig {
      significance: args.significance,
    },
    adf: AdfConfig {
      max_lags: Some(args.max_lag),
      ..AdfConfig::study()
    },
    cointegration_significance: args.significance,
  };

  let report = study::run(&table, &cfg).context("study failed")?;
  println!("{}", render(&report));

  Ok(())
}
