use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single observed price for a symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTick {
    pub symbol: String,

    /// Current price
    pub price: Decimal,

    /// Absolute move from the previous price
    pub change: Decimal,

    /// Move from the previous price, in percent
    pub change_percent: Decimal,

    /// Traded volume for the tick
    pub volume: Decimal,

    /// Quote currency
    pub currency: String,

    pub timestamp: DateTime<Utc>,

    /// Source of the tick (SIMULATED, ...)
    pub source: String,
}

impl PriceTick {
    /// Builds a tick from the previous and current price, deriving the change fields.
    pub fn from_move(
        symbol: impl Into<String>,
        previous: Decimal,
        price: Decimal,
        volume: Decimal,
        currency: impl Into<String>,
        timestamp: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        let change = price - previous;
        let change_percent = if previous.is_zero() {
            Decimal::ZERO
        } else {
            (change / previous * Decimal::ONE_HUNDRED).round_dp(4)
        };
        Self {
            symbol: symbol.into(),
            price,
            change,
            change_percent,
            volume,
            currency: currency.into(),
            timestamp,
            source: source.into(),
        }
    }
}
