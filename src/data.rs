//! # Data
//!
//! Rectangular numeric tables and the CSV loader that feeds them.

pub mod loader;
pub mod table;

pub use loader::from_reader;
pub use loader::read_csv;
pub use table::Table;
