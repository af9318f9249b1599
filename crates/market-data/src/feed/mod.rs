//! Polling price feed.
//!
//! - [`PriceFeed`]: stopped/polling state machine over a [`PriceFeedProvider`](crate::provider::PriceFeedProvider)
//! - [`BackoffPolicy`]: capped exponential backoff for transient failures

mod backoff;
mod price_feed;

pub use backoff::BackoffPolicy;
pub use price_feed::{ConnectionStatus, FeedState, FeedStatus, PriceFeed, PriceFeedConfig};
