//! Diversification scoring - concentration metrics and the penalty-based score.

mod diversification_calculator;
mod diversification_model;

pub use diversification_calculator::*;
pub use diversification_model::*;
