//! Price feed provider trait definition.
//!
//! The price feed talks to quote sources only through [`PriceFeedProvider`],
//! so the simulator can be swapped for a real client without touching
//! consumers.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Instrument, PriceTick};

/// Trait for latest-price sources.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use finboard_market_data::provider::PriceFeedProvider;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl PriceFeedProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn fetch_quote(
///         &self,
///         instrument: &Instrument,
///         previous: Option<&PriceTick>,
///     ) -> Result<PriceTick, MarketDataError> {
///         // call the upstream API
///     }
/// }
/// ```
#[async_trait]
pub trait PriceFeedProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Used for logging and as the `source` of produced ticks.
    fn id(&self) -> &'static str;

    /// Fetch the latest price for an instrument.
    ///
    /// # Arguments
    ///
    /// * `instrument` - The subscribed instrument
    /// * `previous` - The last tick seen for this symbol, if any
    async fn fetch_quote(
        &self,
        instrument: &Instrument,
        previous: Option<&PriceTick>,
    ) -> Result<PriceTick, MarketDataError>;
}
