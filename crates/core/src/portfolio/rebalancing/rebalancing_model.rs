//! Rebalancing models.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use finboard_market_data::AssetClass;

/// Allowed distance of the target total from 100.
const TARGET_SUM_TOLERANCE: Decimal = dec!(0.01);

/// Desired share of portfolio value per asset class, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAllocation {
    pub targets: BTreeMap<AssetClass, Decimal>,
}

impl TargetAllocation {
    pub fn new(targets: impl IntoIterator<Item = (AssetClass, Decimal)>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// Target percentage of `asset_class`; 0 when not targeted.
    pub fn target_for(&self, asset_class: AssetClass) -> Decimal {
        self.targets
            .get(&asset_class)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        self.targets.values().copied().sum()
    }

    /// Targets must each lie in [0, 100] and sum to 100.
    pub fn validate(&self) -> Result<()> {
        if let Some((class, target)) = self
            .targets
            .iter()
            .find(|(_, t)| **t < Decimal::ZERO || **t > Decimal::ONE_HUNDRED)
        {
            return Err(Error::invalid_input(format!(
                "Target for {} must be between 0 and 100, got {}",
                class, target
            )));
        }
        let total = self.total();
        if (total - Decimal::ONE_HUNDRED).abs() > TARGET_SUM_TOLERANCE {
            return Err(Error::invalid_input(format!(
                "Target allocation must sum to 100, got {}",
                total
            )));
        }
        Ok(())
    }
}

impl Default for TargetAllocation {
    fn default() -> Self {
        Self::new([
            (AssetClass::Etf, dec!(60)),
            (AssetClass::Bonds, dec!(30)),
            (AssetClass::Stocks, dec!(10)),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebalanceAction {
    Buy,
    Sell,
    Hold,
}

/// Suggested trade for one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceTrade {
    pub asset_class: AssetClass,
    pub current_value: Decimal,
    pub current_percent: Decimal,
    pub target_percent: Decimal,
    /// `current_percent - target_percent`
    pub deviation: Decimal,
    pub action: RebalanceAction,
    /// Cash to move, 0 for HOLD
    pub amount: Decimal,
    pub estimated_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingPlan {
    pub total_value: Decimal,
    pub tolerance: Decimal,
    pub trades: Vec<RebalanceTrade>,
    /// Number of BUY and SELL trades
    pub trade_count: usize,
    pub total_buy: Decimal,
    pub total_sell: Decimal,
    pub estimated_costs: Decimal,
    pub time_estimate: String,
    pub is_balanced: bool,
}
