//! # Stats
//!
//! $$
//! \Delta y_t=c+\gamma y_{t-1}+\sum_{i=1}^{p}\delta_i\Delta y_{t-i}+\varepsilon_t
//! $$
//!
pub mod regression;
pub mod stationarity;
