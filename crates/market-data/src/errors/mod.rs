//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all price feed operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching prices.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines whether the price feed backs off and retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The asset class string is not one of the supported classes.
    /// This is a terminal error - retrying won't help.
    #[error("Unknown asset class: {0}")]
    UnknownAssetClass(String),

    /// The instrument has no usable reference price.
    #[error("Invalid price for {symbol}: {message}")]
    InvalidPrice {
        /// The symbol with the bad price
        symbol: String,
        /// Why the price was rejected
        message: String,
    },

    /// The request to the provider timed out.
    /// Should retry with exponential backoff.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The connection to the provider dropped mid-request.
    /// Should retry with exponential backoff.
    #[error("Connection lost: {provider}")]
    ConnectionLost {
        /// The provider that dropped the connection
        provider: String,
    },

    /// Every retry attempt for a fetch cycle failed.
    #[error("Retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Message of the final failure
        last_error: String,
    },
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use finboard_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Timeout { provider: "SIMULATED".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::UnknownAssetClass("OPTIONS".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::UnknownAssetClass(_)
            | Self::InvalidPrice { .. }
            | Self::RetriesExhausted { .. } => RetryClass::Never,
            Self::Timeout { .. } | Self::ConnectionLost { .. } => RetryClass::WithBackoff,
        }
    }
}
