use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use super::table::Table;
use crate::error::Result;
use crate::error::StudyError;

/// Load a headed CSV file into a [`Table`].
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
  let path = path.as_ref();
  let file = File::open(path)?;
  let table = from_reader(file)?;
  debug!(
    path = %path.display(),
    rows = table.nrows(),
    cols = table.ncols(),
    "loaded table"
  );
  Ok(table)
}

/// Parse headed CSV from any reader. Blank cells become NaN.
pub fn from_reader<R: Read>(reader: R) -> Result<Table> {
  let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
  let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
  let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

  for (row, record) in reader.records().enumerate() {
    let record = record?;
    for (j, cell) in record.iter().enumerate() {
      let value = if cell.is_empty() {
        f64::NAN
      } else {
        cell.parse::<f64>().map_err(|_| StudyError::ParseCell {
          row: row + 1,
          column: headers[j].clone(),
          value: cell.to_string(),
        })?
      };
      columns[j].push(value);
    }
  }

  Table::new(headers.into_iter().zip(columns).collect())
}
