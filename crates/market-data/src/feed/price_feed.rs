//! Stopped/polling price feed.
//!
//! While polling, a single background task refreshes every subscribed symbol,
//! then sleeps for a short interval when any subscribed market is in session
//! and a long one otherwise. Transient provider failures are retried with
//! capped exponential backoff; the connection status reflects the outcome.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::backoff::BackoffPolicy;
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{resolve_market, Instrument, PriceTick};
use crate::provider::PriceFeedProvider;

/// Poll interval while at least one subscribed market is open.
const DEFAULT_OPEN_INTERVAL: Duration = Duration::from_secs(15);

/// Poll interval while every subscribed market is closed.
const DEFAULT_CLOSED_INTERVAL: Duration = Duration::from_secs(60);

/// Capacity of the tick broadcast channel.
const TICK_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceFeedConfig {
    pub open_interval: Duration,
    pub closed_interval: Duration,
    pub backoff: BackoffPolicy,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            open_interval: DEFAULT_OPEN_INTERVAL,
            closed_interval: DEFAULT_CLOSED_INTERVAL,
            backoff: BackoffPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedState {
    Stopped,
    Polling,
}

/// Health of the link to the provider, for a connection indicator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Connected,
    Reconnecting,
    Disconnected,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    pub state: FeedState,
    pub connection: ConnectionStatus,
    pub subscribed: usize,
    pub last_update: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

struct FeedInner {
    provider: Arc<dyn PriceFeedProvider>,
    config: PriceFeedConfig,
    subscriptions: RwLock<HashMap<String, Instrument>>,
    prices: RwLock<HashMap<String, PriceTick>>,
    connection: RwLock<ConnectionStatus>,
    last_error: RwLock<Option<String>>,
    ticks: broadcast::Sender<PriceTick>,
}

/// Recover the guarded value from a poisoned lock; the worst case is a stale price.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FeedInner {
    fn set_connection(&self, status: ConnectionStatus) {
        let mut current = write(&self.connection);
        if *current != status {
            debug!("Price feed connection {:?} -> {:?}", *current, status);
            *current = status;
        }
    }

    /// Interval until the next refresh, based on the trading hours of subscribed markets.
    fn poll_interval_at(&self, at: DateTime<Utc>) -> Duration {
        let any_open = read(&self.subscriptions)
            .values()
            .any(|instrument| resolve_market(instrument).is_open(at));
        if any_open {
            self.config.open_interval
        } else {
            self.config.closed_interval
        }
    }

    async fn fetch_with_retry(&self, instrument: &Instrument) -> Result<PriceTick, MarketDataError> {
        let policy = &self.config.backoff;
        let attempts = policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let previous = read(&self.prices).get(&instrument.symbol).cloned();
            match self
                .provider
                .fetch_quote(instrument, previous.as_ref())
                .await
            {
                Ok(tick) => {
                    self.set_connection(ConnectionStatus::Connected);
                    *write(&self.last_error) = None;
                    return Ok(tick);
                }
                Err(err) if err.retry_class() == RetryClass::WithBackoff => {
                    attempt += 1;
                    if attempt >= attempts {
                        warn!(
                            "Giving up on {} after {} attempts: {}",
                            instrument.symbol, attempt, err
                        );
                        self.set_connection(ConnectionStatus::Disconnected);
                        let exhausted = MarketDataError::RetriesExhausted {
                            attempts: attempt,
                            last_error: err.to_string(),
                        };
                        *write(&self.last_error) = Some(exhausted.to_string());
                        return Err(exhausted);
                    }
                    let delay = policy.delay(attempt - 1);
                    debug!(
                        "Fetch for {} failed ({}), retrying in {:?}",
                        instrument.symbol, err, delay
                    );
                    self.set_connection(ConnectionStatus::Reconnecting);
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    warn!("Fetch for {} failed: {}", instrument.symbol, err);
                    *write(&self.last_error) = Some(err.to_string());
                    return Err(err);
                }
            }
        }
    }

    /// Fetches `instrument`, stores and broadcasts the tick.
    async fn refresh(&self, instrument: &Instrument) -> Result<PriceTick, MarketDataError> {
        let tick = self.fetch_with_retry(instrument).await?;
        // The symbol may have been unsubscribed while the fetch was in flight.
        if !read(&self.subscriptions).contains_key(&instrument.symbol) {
            return Ok(tick);
        }
        write(&self.prices).insert(tick.symbol.clone(), tick.clone());
        // No receivers is fine
        let _ = self.ticks.send(tick.clone());
        Ok(tick)
    }

    async fn refresh_all(&self) -> Vec<PriceTick> {
        let instruments: Vec<Instrument> = read(&self.subscriptions).values().cloned().collect();
        let mut ticks = Vec::with_capacity(instruments.len());
        for instrument in &instruments {
            if let Ok(tick) = self.refresh(instrument).await {
                ticks.push(tick);
            }
        }
        ticks
    }
}

/// Latest-price cache fed by a polling loop.
pub struct PriceFeed {
    inner: Arc<FeedInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PriceFeed {
    pub fn new(provider: Arc<dyn PriceFeedProvider>, config: PriceFeedConfig) -> Self {
        let (ticks, _) = broadcast::channel(TICK_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(FeedInner {
                provider,
                config,
                subscriptions: RwLock::new(HashMap::new()),
                prices: RwLock::new(HashMap::new()),
                connection: RwLock::new(ConnectionStatus::Disconnected),
                last_error: RwLock::new(None),
                ticks,
            }),
            task: Mutex::new(None),
        }
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|poisoned| {
            warn!("Price feed task mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Adds instruments to the watch set and fetches each new one immediately.
    ///
    /// Returns the ticks obtained by the immediate fetch. Symbols already
    /// subscribed are updated in place but not re-fetched.
    pub async fn subscribe(&self, instruments: Vec<Instrument>) -> Vec<PriceTick> {
        let mut added = Vec::new();
        {
            let mut subscriptions = write(&self.inner.subscriptions);
            for instrument in instruments {
                if subscriptions
                    .insert(instrument.symbol.clone(), instrument.clone())
                    .is_none()
                {
                    added.push(instrument);
                }
            }
        }
        if !added.is_empty() {
            info!("Subscribed to {} new symbol(s)", added.len());
        }

        let mut ticks = Vec::with_capacity(added.len());
        for instrument in &added {
            if let Ok(tick) = self.inner.refresh(instrument).await {
                ticks.push(tick);
            }
        }
        ticks
    }

    /// Removes symbols from the watch set together with their cached prices.
    pub fn unsubscribe<S: AsRef<str>>(&self, symbols: &[S]) {
        let mut subscriptions = write(&self.inner.subscriptions);
        let mut prices = write(&self.inner.prices);
        for symbol in symbols {
            subscriptions.remove(symbol.as_ref());
            prices.remove(symbol.as_ref());
        }
        debug!("Unsubscribed {} symbol(s)", symbols.len());
    }

    pub fn latest(&self, symbol: &str) -> Option<PriceTick> {
        read(&self.inner.prices).get(symbol).cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, PriceTick> {
        read(&self.inner.prices).clone()
    }

    pub fn subscribed_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = read(&self.inner.subscriptions).keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Receiver for every tick stored by the feed.
    pub fn ticks(&self) -> broadcast::Receiver<PriceTick> {
        self.inner.ticks.subscribe()
    }

    /// Refreshes every subscribed symbol once, outside the polling loop.
    pub async fn refresh_now(&self) -> Vec<PriceTick> {
        self.inner.refresh_all().await
    }

    pub fn poll_interval_at(&self, at: DateTime<Utc>) -> Duration {
        self.inner.poll_interval_at(at)
    }

    pub fn state(&self) -> FeedState {
        match self.lock_task().as_ref() {
            Some(handle) if !handle.is_finished() => FeedState::Polling,
            _ => FeedState::Stopped,
        }
    }

    pub fn status(&self) -> FeedStatus {
        let prices = read(&self.inner.prices);
        FeedStatus {
            state: self.state(),
            connection: *read(&self.inner.connection),
            subscribed: read(&self.inner.subscriptions).len(),
            last_update: prices.values().map(|tick| tick.timestamp).max(),
            last_error: read(&self.inner.last_error).clone(),
        }
    }

    /// Enters the polling state. Must be called within a tokio runtime.
    ///
    /// Does nothing when already polling.
    pub fn start(&self) {
        let mut task = self.lock_task();
        if matches!(task.as_ref(), Some(handle) if !handle.is_finished()) {
            debug!("Price feed already polling");
            return;
        }

        let inner = Arc::clone(&self.inner);
        *task = Some(tokio::spawn(async move {
            info!("Price feed polling started");
            loop {
                let ticks = inner.refresh_all().await;
                let delay = inner.poll_interval_at(Utc::now());
                debug!(
                    "Refreshed {} symbol(s), next poll in {:?}",
                    ticks.len(),
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }));
    }

    /// Leaves the polling state, cancelling the pending timer.
    pub fn stop(&self) {
        if let Some(handle) = self.lock_task().take() {
            handle.abort();
            info!("Price feed polling stopped");
        }
    }
}

impl Drop for PriceFeed {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_task().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetClass;
    use crate::provider::SimulatedProvider;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn btc() -> Instrument {
        Instrument::new("BTC-EUR", AssetClass::Crypto, "EUR", dec!(60000))
    }

    fn milan_stock() -> Instrument {
        Instrument::new("ENI.MI", AssetClass::Stocks, "EUR", dec!(14))
    }

    fn simulated_feed() -> PriceFeed {
        PriceFeed::new(
            Arc::new(SimulatedProvider::seeded(3)),
            PriceFeedConfig::default(),
        )
    }

    /// Fails the first `failures` fetches, then delegates to a seeded simulator.
    struct FlakyProvider {
        failures: u32,
        calls: AtomicU32,
        inner: SimulatedProvider,
    }

    impl FlakyProvider {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                inner: SimulatedProvider::seeded(5),
            }
        }
    }

    #[async_trait]
    impl PriceFeedProvider for FlakyProvider {
        fn id(&self) -> &'static str {
            "FLAKY"
        }

        async fn fetch_quote(
            &self,
            instrument: &Instrument,
            previous: Option<&PriceTick>,
        ) -> Result<PriceTick, MarketDataError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(MarketDataError::ConnectionLost {
                    provider: "FLAKY".to_string(),
                });
            }
            self.inner.fetch_quote(instrument, previous).await
        }
    }

    #[tokio::test]
    async fn test_subscribe_fetches_immediately() {
        let feed = simulated_feed();
        let ticks = feed.subscribe(vec![btc()]).await;

        assert_eq!(ticks.len(), 1);
        assert_eq!(feed.latest("BTC-EUR"), Some(ticks[0].clone()));
        assert_eq!(feed.status().connection, ConnectionStatus::Connected);
        assert_eq!(feed.state(), FeedState::Stopped);
    }

    #[tokio::test]
    async fn test_resubscribe_does_not_refetch() {
        let feed = simulated_feed();
        feed.subscribe(vec![btc()]).await;
        let ticks = feed.subscribe(vec![btc()]).await;
        assert!(ticks.is_empty());
        assert_eq!(feed.subscribed_symbols(), vec!["BTC-EUR".to_string()]);
    }

    #[tokio::test]
    async fn test_unsubscribe_drops_cached_price() {
        let feed = simulated_feed();
        feed.subscribe(vec![btc(), milan_stock()]).await;
        feed.unsubscribe(&["BTC-EUR"]);

        assert!(feed.latest("BTC-EUR").is_none());
        assert!(feed.latest("ENI.MI").is_some());
        assert_eq!(feed.status().subscribed, 1);
    }

    #[test]
    fn test_poll_interval_follows_trading_hours() {
        let feed = simulated_feed();
        write(&feed.inner.subscriptions).insert("ENI.MI".to_string(), milan_stock());

        // Wednesday 10:00 UTC, Milan in session
        let open = Utc.with_ymd_and_hms(2024, 3, 13, 10, 0, 0).unwrap();
        // Wednesday 20:00 UTC, Milan closed
        let closed = Utc.with_ymd_and_hms(2024, 3, 13, 20, 0, 0).unwrap();

        assert_eq!(feed.poll_interval_at(open), Duration::from_secs(15));
        assert_eq!(feed.poll_interval_at(closed), Duration::from_secs(60));
    }

    #[test]
    fn test_poll_interval_without_subscriptions_is_slow() {
        let feed = simulated_feed();
        assert_eq!(feed.poll_interval_at(Utc::now()), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_reschedules_after_open_interval() {
        let feed = simulated_feed();
        let mut rx = feed.ticks();
        feed.subscribe(vec![btc()]).await;
        rx.recv().await.unwrap();

        let started = Instant::now();
        feed.start();
        assert_eq!(feed.state(), FeedState::Polling);

        // Immediate refresh on entering the polling state
        rx.recv().await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));

        // Crypto never closes, so the next refresh uses the short interval
        rx.recv().await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(15) && elapsed < Duration::from_secs(16));

        feed.stop();
        tokio::task::yield_now().await;
        assert_eq!(feed.state(), FeedState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried_with_backoff() {
        let feed = PriceFeed::new(Arc::new(FlakyProvider::new(2)), PriceFeedConfig::default());
        let started = Instant::now();
        let ticks = feed.subscribe(vec![btc()]).await;

        assert_eq!(ticks.len(), 1);
        // 1s + 2s of backoff before the third attempt
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(feed.status().connection, ConnectionStatus::Connected);
        assert!(feed.status().last_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_disconnect() {
        let feed = PriceFeed::new(Arc::new(FlakyProvider::new(10)), PriceFeedConfig::default());
        let ticks = feed.subscribe(vec![btc()]).await;

        assert!(ticks.is_empty());
        assert!(feed.latest("BTC-EUR").is_none());
        let status = feed.status();
        assert_eq!(status.connection, ConnectionStatus::Disconnected);
        assert!(status.last_error.unwrap().contains("Retries exhausted"));
    }
}
