//! # Regression
//!
//! $$
//! \bar R^2 = 1-(1-R^2)\frac{n-1}{n-k}
//! $$
//!
//! Ordinary least squares on named table columns and greedy forward selection.

pub mod formula;
pub mod ols;
pub mod stepwise;

pub use formula::Formula;
pub use formula::INTERCEPT;
pub use ols::FittedModel;
pub use ols::Parameter;
pub use ols::fit;
pub use stepwise::CandidateScore;
pub use stepwise::SelectionRound;
pub use stepwise::StepwiseConfig;
pub use stepwise::StepwiseOutcome;
pub use stepwise::forward_select;
