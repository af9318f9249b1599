//! Value-weighted risk level of the portfolio.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::investments::Investment;
use crate::portfolio::allocation::asset_allocation;
use finboard_market_data::AssetClass;

const LOW_RISK_CEILING: Decimal = dec!(2.5);
const MEDIUM_RISK_CEILING: Decimal = dec!(3.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: Decimal) -> Self {
        if score < LOW_RISK_CEILING {
            Self::Low
        } else if score < MEDIUM_RISK_CEILING {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Value-weighted average of class risk weights, 1 (lowest) to 5
    pub score: Decimal,
    pub level: RiskLevel,
    /// Class with the largest share of value, if any
    pub dominant_class: Option<AssetClass>,
}

/// Risk weight of an asset class on a 1-5 scale.
pub fn risk_weight(asset_class: AssetClass) -> Decimal {
    match asset_class {
        AssetClass::Bonds => dec!(1),
        AssetClass::RealEstate => dec!(2),
        AssetClass::Etf | AssetClass::Commodities => dec!(3),
        AssetClass::Stocks | AssetClass::Alternative => dec!(4),
        AssetClass::Crypto => dec!(5),
    }
}

/// Scores the portfolio by the risk weights of what it holds.
///
/// Holdings without value do not count; an empty portfolio is low risk with score 0.
pub fn risk_assessment(investments: &[Investment]) -> RiskAssessment {
    let total_value: Decimal = investments.iter().map(|i| i.current_value).sum();
    if total_value <= Decimal::ZERO {
        return RiskAssessment {
            score: Decimal::ZERO,
            level: RiskLevel::Low,
            dominant_class: None,
        };
    }

    let weighted: Decimal = investments
        .iter()
        .map(|i| risk_weight(i.asset_class) * i.current_value)
        .sum();
    let score = (weighted / total_value).round_dp(DISPLAY_DECIMAL_PRECISION);
    let dominant_class = asset_allocation(investments)
        .first()
        .and_then(|slice| slice.key.parse().ok());

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        dominant_class,
    }
}
