//! # Errors
//!
//! Every fallible library operation returns [`StudyError`]. Statistical
//! verdicts (stationary or not, cointegrated or not) are data and never show
//! up here.

use thiserror::Error;

/// Errors raised while loading data, fitting regressions or running ADF tests.
#[derive(Debug, Error)]
pub enum StudyError {
  /// The series is too short for the requested ADF lag structure.
  #[error("series of length {len} is too short for the requested lag structure (need at least {required})")]
  InsufficientData { len: usize, required: usize },

  /// The series handed to a unit-root test contains NaN or infinite values.
  #[error("series must contain only finite values")]
  NonFiniteSeries,

  /// The response variable is not a column of the table.
  #[error("response column `{response}` is not present in the table")]
  DegenerateFormula { response: String },

  #[error("unknown column `{0}`")]
  UnknownColumn(String),

  #[error("duplicate column `{0}`")]
  DuplicateColumn(String),

  #[error("column `{name}` has {len} rows, expected {expected}")]
  RaggedColumn {
    name: String,
    len: usize,
    expected: usize,
  },

  #[error("table has no columns")]
  EmptyTable,

  /// `X'X` could not be inverted.
  #[error("singular design matrix")]
  SingularDesign,

  /// OLS needs strictly more observations than parameters.
  #[error("OLS needs more observations than parameters ({nobs} <= {params})")]
  TooFewObservations { nobs: usize, params: usize },

  #[error("cannot parse `{value}` in column `{column}` (row {row}) as a number")]
  ParseCell {
    row: usize,
    column: String,
    value: String,
  },

  #[error(transparent)]
  Csv(#[from] csv::Error),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StudyError>;
