use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Concentration inputs to the diversification score.
///
/// Percentages are shares of total portfolio value (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentrationMetrics {
    pub largest_holding_percent: Decimal,
    pub largest_sector_percent: Decimal,
    pub largest_country_percent: Decimal,
    pub holdings_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcentrationRule {
    SingleHolding,
    Sector,
    Country,
    HoldingCount,
}

/// Points deducted by one triggered rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    pub rule: ConcentrationRule,
    pub points: u32,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiversificationLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DiversificationLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= 85 {
            Self::Excellent
        } else if score >= 70 {
            Self::Good
        } else if score >= 50 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiversificationReport {
    /// 0-100, higher is better diversified
    pub score: u32,
    pub level: DiversificationLevel,
    pub metrics: ConcentrationMetrics,
    pub penalties: Vec<Penalty>,
    pub recommendations: Vec<String>,
}
