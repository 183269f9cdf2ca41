use crate::error::Result;
use crate::error::StudyError;

/// A named numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
  pub name: String,
  pub values: Vec<f64>,
}

/// Ordered set of named columns sharing the same number of observations.
///
/// Rows are observations, columns are variables. Missing values are not
/// handled here: a NaN cell is stored as is and flows into whatever fit
/// consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
  columns: Vec<Column>,
  nrows: usize,
}

impl Table {
  /// Build a table from `(name, values)` pairs, keeping their order.
  pub fn new<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
    let mut out: Vec<Column> = Vec::with_capacity(columns.len());
    let mut nrows = None;

    for (name, values) in columns {
      let name = name.into();
      if out.iter().any(|c| c.name == name) {
        return Err(StudyError::DuplicateColumn(name));
      }

      let expected = *nrows.get_or_insert(values.len());
      if values.len() != expected {
        return Err(StudyError::RaggedColumn {
          name,
          len: values.len(),
          expected,
        });
      }

      out.push(Column { name, values });
    }

    let Some(nrows) = nrows else {
      return Err(StudyError::EmptyTable);
    };

    Ok(Self {
      columns: out,
      nrows,
    })
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }

  pub fn ncols(&self) -> usize {
    self.columns.len()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.columns.iter().any(|c| c.name == name)
  }

  /// Column names in table order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.columns.iter().map(|c| c.name.as_str())
  }

  pub fn column(&self, name: &str) -> Result<&[f64]> {
    self
      .columns
      .iter()
      .find(|c| c.name == name)
      .map(|c| c.values.as_slice())
      .ok_or_else(|| StudyError::UnknownColumn(name.to_string()))
  }

  /// Every column except `response`, in table order.
  pub fn candidates(&self, response: &str) -> Vec<String> {
    self
      .names()
      .filter(|name| *name != response)
      .map(str::to_string)
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::Table;
  use crate::error::StudyError;

  fn sample() -> Table {
    Table::new(vec![
      ("y", vec![1.0, 2.0, 3.0]),
      ("x1", vec![0.5, 0.1, 0.9]),
      ("x2", vec![4.0, 4.0, 5.0]),
    ])
    .unwrap()
  }

  #[test]
  fn keeps_column_order() {
    let table = sample();
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["y", "x1", "x2"]);
    assert_eq!(table.nrows(), 3);
    assert_eq!(table.ncols(), 3);
    assert_eq!(table.candidates("y"), vec!["x1", "x2"]);
    assert_eq!(table.column("x2").unwrap(), &[4.0, 4.0, 5.0]);
  }

  #[test]
  fn rejects_duplicate_names() {
    let err = Table::new(vec![("a", vec![1.0]), ("a", vec![2.0])]).unwrap_err();
    assert!(matches!(err, StudyError::DuplicateColumn(name) if name == "a"));
  }

  #[test]
  fn rejects_ragged_columns() {
    let err = Table::new(vec![("a", vec![1.0, 2.0]), ("b", vec![2.0])]).unwrap_err();
    assert!(matches!(
      err,
      StudyError::RaggedColumn {
        len: 1,
        expected: 2,
        ..
      }
    ));
  }

  #[test]
  fn rejects_empty_table() {
    let err = Table::new(Vec::<(String, Vec<f64>)>::new()).unwrap_err();
    assert!(matches!(err, StudyError::EmptyTable));
  }

  #[test]
  fn unknown_column_is_an_error() {
    assert!(matches!(
      sample().column("z"),
      Err(StudyError::UnknownColumn(_))
    ));
  }
}
