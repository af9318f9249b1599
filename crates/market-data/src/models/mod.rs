//! Market data models
//!
//! - `instrument` - Asset classification (AssetClass) and subscribable instruments (Instrument)
//! - `market` - Trading venues and their weekday trading hours (Market)
//! - `quote` - Price ticks produced by providers (PriceTick)

mod instrument;
mod market;
mod quote;

pub use instrument::{AssetClass, Instrument};
pub use market::{resolve_market, Market};
pub use quote::PriceTick;
