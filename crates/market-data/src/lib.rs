//! Finboard Market Data Crate
//!
//! This crate provides the price feed used by the Finboard portfolio core.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +---------------------+
//! |   Domain Layer   | --> |     PriceFeed       |  (subscribe / unsubscribe / latest)
//! +------------------+     +---------------------+
//!                                   |
//!                                   v
//!                         +---------------------+
//!                         |  PriceFeedProvider  |  (SimulatedProvider, or a real client)
//!                         +---------------------+
//!                                   |
//!                                   v
//!                         +---------------------+
//!                         |     PriceTick       |  (price, change, volume)
//!                         +---------------------+
//! ```
//!
//! # Core Types
//!
//! - [`AssetClass`] - Asset classification with per-class volatility
//! - [`Instrument`] - A subscribable symbol with its reference price
//! - [`Market`] - Trading venue with static weekday hours
//! - [`PriceTick`] - A single observed price
//! - [`PriceFeed`] - Stopped/polling state machine with retry and backoff

pub mod errors;
pub mod feed;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, RetryClass};
pub use feed::{BackoffPolicy, ConnectionStatus, FeedState, FeedStatus, PriceFeed, PriceFeedConfig};
pub use models::{resolve_market, AssetClass, Instrument, Market, PriceTick};
pub use provider::{PriceFeedProvider, SimulatedProvider, SIMULATED_PROVIDER_ID};
