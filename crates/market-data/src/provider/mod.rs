//! Price feed provider abstraction and implementations.
//!
//! This module contains:
//! - The `PriceFeedProvider` trait that every quote source implements
//! - `SimulatedProvider`, a random-walk source used in place of a live feed

mod simulated;
mod traits;

pub use simulated::{SimulatedProvider, SIMULATED_PROVIDER_ID};
pub use traits::PriceFeedProvider;
