//! # stepwise-coint
//!
//! Exploratory time-series econometrics on a rectangular table: forward
//! stepwise OLS selection, ADF unit-root screening of the chosen regressors
//! and a residual-based cointegration check.
//!
//! ```ignore
//! let table = stepwise_coint::data::read_csv("data.csv")?;
//! let report = stepwise_coint::study::run(&table, &StudyConfig::default())?;
//! println!("{}", stepwise_coint::report::render(&report));
//! ```

pub mod data;
pub mod error;
pub mod report;
pub mod stats;
pub mod study;

pub use data::Table;
pub use error::Result;
pub use error::StudyError;
pub use study::StudyConfig;
pub use study::StudyReport;
pub use study::run;
