//! Portfolio performance module - return figures and the dashboard summary.

mod performance_model;

pub use performance_model::*;
