//! Portfolio allocation module for asset class, sector and country breakdowns.

mod allocation_calculator;
mod allocation_model;

pub use allocation_calculator::*;
pub use allocation_model::*;
