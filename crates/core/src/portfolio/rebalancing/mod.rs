//! Rebalancing toward a target asset class allocation.

mod rebalancing_calculator;
mod rebalancing_model;

pub use rebalancing_calculator::*;
pub use rebalancing_model::*;
