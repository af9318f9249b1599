//! Application settings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BASE_CURRENCY;
use crate::errors::{Error, Result};
use crate::portfolio::TargetAllocation;

/// Largest tolerance (percentage points) a rebalancing check accepts.
const MAX_REBALANCE_TOLERANCE: Decimal = dec!(50);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub base_currency: String,
    /// Allowed drift from the target allocation, in percentage points
    pub rebalance_tolerance: Decimal,
    pub target_allocation: TargetAllocation,
    /// Price refresh cadence while a subscribed market is open
    pub price_refresh_open_secs: u64,
    /// Price refresh cadence while every subscribed market is closed
    pub price_refresh_closed_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            rebalance_tolerance: dec!(5),
            target_allocation: TargetAllocation::default(),
            price_refresh_open_secs: 15,
            price_refresh_closed_secs: 60,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let currency = self.base_currency.as_str();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::InvalidConfigValue(format!(
                "base currency must be a 3-letter ISO code, got '{}'",
                currency
            )));
        }
        if self.rebalance_tolerance < Decimal::ZERO
            || self.rebalance_tolerance > MAX_REBALANCE_TOLERANCE
        {
            return Err(Error::InvalidConfigValue(format!(
                "rebalance tolerance must be between 0 and {}, got {}",
                MAX_REBALANCE_TOLERANCE, self.rebalance_tolerance
            )));
        }
        self.target_allocation
            .validate()
            .map_err(|e| Error::InvalidConfigValue(e.to_string()))?;
        if self.price_refresh_open_secs == 0 || self.price_refresh_closed_secs == 0 {
            return Err(Error::InvalidConfigValue(
                "price refresh intervals must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a copy with `update` applied, or the validation error.
    pub fn with_update(&self, update: &SettingsUpdate) -> Result<Settings> {
        let mut next = self.clone();
        if let Some(currency) = &update.base_currency {
            next.base_currency = currency.trim().to_uppercase();
        }
        if let Some(tolerance) = update.rebalance_tolerance {
            next.rebalance_tolerance = tolerance;
        }
        if let Some(targets) = &update.target_allocation {
            next.target_allocation = targets.clone();
        }
        if let Some(secs) = update.price_refresh_open_secs {
            next.price_refresh_open_secs = secs;
        }
        if let Some(secs) = update.price_refresh_closed_secs {
            next.price_refresh_closed_secs = secs;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial settings change; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub base_currency: Option<String>,
    pub rebalance_tolerance: Option<Decimal>,
    pub target_allocation: Option<TargetAllocation>,
    pub price_refresh_open_secs: Option<u64>,
    pub price_refresh_closed_secs: Option<u64>,
}
