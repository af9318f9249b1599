//! Portfolio aggregator: pure analytics over a slice of holdings.
//!
//! Every calculator takes `&[Investment]` and returns a value; none mutates
//! its input. [`PortfolioService`] loads the active holdings and the
//! configured targets and calls them.

pub mod allocation;
pub mod diversification;
pub mod performance;
pub mod rebalancing;
pub mod risk;

mod portfolio_service;


pub use allocation::*;
pub use diversification::*;
pub use performance::*;
pub use portfolio_service::{PortfolioAnalytics, PortfolioService, PortfolioServiceTrait};
pub use rebalancing::*;
pub use risk::*;
