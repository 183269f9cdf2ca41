//! Stationarity and unit-root tests.

mod common;

pub mod adf;

pub use adf::AdfConfig;
pub use adf::AdfResult;
pub use adf::adf_test;
pub use common::CriticalValues;
pub use common::DeterministicTerm;
pub use common::LagSelection;
pub use common::difference;
pub use common::difference_n;
pub use common::mackinnon_p_value;
