//! Random-walk price source.
//!
//! Each fetch moves the previous price by a normally distributed shock scaled
//! by the instrument's asset-class volatility. A configurable share of
//! fetches fails with a transient error so retry paths get exercised.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::traits::PriceFeedProvider;
use crate::errors::MarketDataError;
use crate::models::{Instrument, PriceTick};

pub const SIMULATED_PROVIDER_ID: &str = "SIMULATED";

/// Shocks beyond this many standard deviations are clipped.
const MAX_SIGMA: f64 = 4.0;

/// Prices never drop below one cent.
const PRICE_FLOOR: Decimal = dec!(0.01);

pub struct SimulatedProvider {
    rng: Mutex<StdRng>,
    /// Probability in [0, 1] that a fetch fails with a timeout.
    failure_rate: f64,
    /// Artificial latency applied to every fetch.
    latency: Duration,
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedProvider {
    /// Create a provider seeded from system entropy, with no failures and no latency.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            failure_rate: 0.0,
            latency: Duration::ZERO,
        }
    }

    /// Create a deterministic provider.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            failure_rate: 0.0,
            latency: Duration::ZERO,
        }
    }

    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| {
            warn!("Simulated provider RNG mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Draws the next price and volume. Returns `None` when the injected failure fires.
    fn draw(&self, previous: Decimal, volatility: Decimal) -> Option<(Decimal, Decimal)> {
        let mut rng = self.lock_rng();
        if self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate) {
            return None;
        }
        let sigma: f64 = StandardNormal.sample(&mut *rng);
        let shock = Decimal::try_from(sigma.clamp(-MAX_SIGMA, MAX_SIGMA)).unwrap_or(Decimal::ZERO);
        let price = (previous * (Decimal::ONE + shock * volatility))
            .round_dp(4)
            .max(PRICE_FLOOR);
        let volume = Decimal::from(rng.gen_range(1_000u32..100_000u32));
        Some((price, volume))
    }
}

#[async_trait]
impl PriceFeedProvider for SimulatedProvider {
    fn id(&self) -> &'static str {
        SIMULATED_PROVIDER_ID
    }

    async fn fetch_quote(
        &self,
        instrument: &Instrument,
        previous: Option<&PriceTick>,
    ) -> Result<PriceTick, MarketDataError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let previous_price = previous
            .map(|tick| tick.price)
            .unwrap_or(instrument.reference_price);
        if previous_price <= Decimal::ZERO {
            return Err(MarketDataError::InvalidPrice {
                symbol: instrument.symbol.clone(),
                message: format!("reference price {} must be positive", previous_price),
            });
        }

        let (price, volume) = self
            .draw(previous_price, instrument.asset_class.volatility())
            .ok_or_else(|| MarketDataError::Timeout {
                provider: SIMULATED_PROVIDER_ID.to_string(),
            })?;

        debug!(
            "Simulated tick for {}: {} -> {}",
            instrument.symbol, previous_price, price
        );

        Ok(PriceTick::from_move(
            instrument.symbol.clone(),
            previous_price,
            price,
            volume,
            instrument.currency.clone(),
            Utc::now(),
            SIMULATED_PROVIDER_ID,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RetryClass;
    use crate::models::AssetClass;

    fn bond() -> Instrument {
        Instrument::new("BTP.MI", AssetClass::Bonds, "EUR", dec!(100))
    }

    #[tokio::test]
    async fn test_tick_moves_from_reference_price() {
        let provider = SimulatedProvider::seeded(7);
        let tick = provider.fetch_quote(&bond(), None).await.unwrap();

        assert_eq!(tick.symbol, "BTP.MI");
        assert_eq!(tick.source, SIMULATED_PROVIDER_ID);
        assert_eq!(tick.change, tick.price - dec!(100));
        // 4 sigma of 0.3% bounds a bond move to 1.2%
        assert!(tick.price >= dec!(98.8) && tick.price <= dec!(101.2));
        assert!(tick.volume >= dec!(1000));
    }

    #[tokio::test]
    async fn test_tick_chains_from_previous() {
        let provider = SimulatedProvider::seeded(11);
        let first = provider.fetch_quote(&bond(), None).await.unwrap();
        let second = provider.fetch_quote(&bond(), Some(&first)).await.unwrap();
        assert_eq!(second.change, second.price - first.price);
    }

    #[tokio::test]
    async fn test_same_seed_same_ticks() {
        let a = SimulatedProvider::seeded(42);
        let b = SimulatedProvider::seeded(42);
        let ta = a.fetch_quote(&bond(), None).await.unwrap();
        let tb = b.fetch_quote(&bond(), None).await.unwrap();
        assert_eq!(ta.price, tb.price);
        assert_eq!(ta.volume, tb.volume);
    }

    #[tokio::test]
    async fn test_injected_failure_is_transient() {
        let provider = SimulatedProvider::seeded(1).with_failure_rate(1.0);
        let err = provider.fetch_quote(&bond(), None).await.unwrap_err();
        assert_eq!(err.retry_class(), RetryClass::WithBackoff);
    }

    #[tokio::test]
    async fn test_non_positive_reference_price_rejected() {
        let provider = SimulatedProvider::seeded(1);
        let broken = Instrument::new("ZERO", AssetClass::Stocks, "EUR", Decimal::ZERO);
        let err = provider.fetch_quote(&broken, None).await.unwrap_err();
        assert_eq!(err.retry_class(), RetryClass::Never);
    }
}
