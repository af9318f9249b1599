//! Penalty-based diversification score.
//!
//! The score starts at 100 and each rule deducts the points of the highest
//! threshold it crosses:
//!
//! | rule            | thresholds (share of value) | points      |
//! |-----------------|-----------------------------|-------------|
//! | single holding  | > 40% / > 25% / > 15%       | 30 / 20 / 10 |
//! | sector          | > 50% / > 35% / > 25%       | 25 / 15 / 5 |
//! | country         | > 70% / > 50%               | 20 / 10     |
//! | holdings count  | < 3 / < 5                   | 25 / 10     |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{
    ConcentrationMetrics, ConcentrationRule, DiversificationLevel, DiversificationReport, Penalty,
};
use crate::constants::{DECIMAL_PRECISION, UNSPECIFIED_LABEL};
use crate::investments::Investment;
use crate::portfolio::allocation::{geographic_allocation, sector_allocation, AllocationSlice};

const MAX_SCORE: u32 = 100;

const HOLDING_TIERS: [(Decimal, u32); 3] = [(dec!(40), 30), (dec!(25), 20), (dec!(15), 10)];
const SECTOR_TIERS: [(Decimal, u32); 3] = [(dec!(50), 25), (dec!(35), 15), (dec!(25), 5)];
const COUNTRY_TIERS: [(Decimal, u32); 2] = [(dec!(70), 20), (dec!(50), 10)];
const COUNT_TIERS: [(usize, u32); 2] = [(3, 25), (5, 10)];

/// Measures how concentrated `investments` are.
pub fn concentration_metrics(investments: &[Investment]) -> ConcentrationMetrics {
    let total_value: Decimal = investments.iter().map(|i| i.current_value).sum();
    let largest_holding_percent = if total_value > Decimal::ZERO {
        investments
            .iter()
            .map(|i| {
                (i.current_value / total_value * Decimal::ONE_HUNDRED).round_dp(DECIMAL_PRECISION)
            })
            .max()
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    ConcentrationMetrics {
        largest_holding_percent,
        largest_sector_percent: largest_specified(&sector_allocation(investments)),
        largest_country_percent: largest_specified(&geographic_allocation(investments)),
        holdings_count: investments.len(),
    }
}

fn largest_specified(slices: &[AllocationSlice]) -> Decimal {
    slices
        .iter()
        .filter(|s| s.key != UNSPECIFIED_LABEL)
        .map(|s| s.percentage)
        .max()
        .unwrap_or(Decimal::ZERO)
}

fn tier_points(value: Decimal, tiers: &[(Decimal, u32)]) -> Option<(Decimal, u32)> {
    tiers.iter().copied().find(|(threshold, _)| value > *threshold)
}

/// Every rule `metrics` triggers, with the points it costs.
pub fn penalties(metrics: &ConcentrationMetrics) -> Vec<Penalty> {
    let mut penalties = Vec::new();

    if let Some((threshold, points)) = tier_points(metrics.largest_holding_percent, &HOLDING_TIERS)
    {
        penalties.push(Penalty {
            rule: ConcentrationRule::SingleHolding,
            points,
            recommendation: format!(
                "Largest holding is {}% of the portfolio (above {}%); consider spreading it across more positions",
                metrics.largest_holding_percent.round_dp(2),
                threshold
            ),
        });
    }
    if let Some((threshold, points)) = tier_points(metrics.largest_sector_percent, &SECTOR_TIERS) {
        penalties.push(Penalty {
            rule: ConcentrationRule::Sector,
            points,
            recommendation: format!(
                "Largest sector is {}% of the portfolio (above {}%); add exposure to other sectors",
                metrics.largest_sector_percent.round_dp(2),
                threshold
            ),
        });
    }
    if let Some((threshold, points)) = tier_points(metrics.largest_country_percent, &COUNTRY_TIERS)
    {
        penalties.push(Penalty {
            rule: ConcentrationRule::Country,
            points,
            recommendation: format!(
                "Largest country is {}% of the portfolio (above {}%); consider international diversification",
                metrics.largest_country_percent.round_dp(2),
                threshold
            ),
        });
    }
    if let Some((minimum, points)) = COUNT_TIERS
        .iter()
        .copied()
        .find(|(minimum, _)| metrics.holdings_count < *minimum)
    {
        penalties.push(Penalty {
            rule: ConcentrationRule::HoldingCount,
            points,
            recommendation: format!(
                "Only {} holding(s); aim for at least {}",
                metrics.holdings_count, minimum
            ),
        });
    }
    penalties
}

/// Score in [0, 100] after deducting every triggered penalty.
pub fn score_from_metrics(metrics: &ConcentrationMetrics) -> u32 {
    let deducted: u32 = penalties(metrics).iter().map(|p| p.points).sum();
    MAX_SCORE.saturating_sub(deducted)
}

/// Scores how well `investments` are spread across holdings, sectors and countries.
///
/// An empty portfolio scores 0.
pub fn diversification_score(investments: &[Investment]) -> DiversificationReport {
    let metrics = concentration_metrics(investments);
    if investments.is_empty() {
        return DiversificationReport {
            score: 0,
            level: DiversificationLevel::Poor,
            metrics,
            penalties: Vec::new(),
            recommendations: vec![
                "Add holdings to start building a diversified portfolio".to_string(),
            ],
        };
    }

    let penalties = penalties(&metrics);
    let deducted: u32 = penalties.iter().map(|p| p.points).sum();
    let score = MAX_SCORE.saturating_sub(deducted);
    DiversificationReport {
        score,
        level: DiversificationLevel::from_score(score),
        metrics,
        recommendations: penalties.iter().map(|p| p.recommendation.clone()).collect(),
        penalties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investments::NewInvestment;
    use finboard_market_data::AssetClass;

    fn metrics(
        holding: Decimal,
        sector: Decimal,
        country: Decimal,
        count: usize,
    ) -> ConcentrationMetrics {
        ConcentrationMetrics {
            largest_holding_percent: holding,
            largest_sector_percent: sector,
            largest_country_percent: country,
            holdings_count: count,
        }
    }

    fn holding(value: Decimal, sector: &str, country: &str) -> Investment {
        Investment::from(NewInvestment {
            name: "Holding".to_string(),
            symbol: "SYM".to_string(),
            asset_class: AssetClass::Stocks,
            quantity: Decimal::ONE,
            average_price: value,
            current_price: None,
            fees: Decimal::ZERO,
            currency: "EUR".to_string(),
            sector: Some(sector.to_string()).filter(|s| !s.is_empty()),
            country: Some(country.to_string()).filter(|c| !c.is_empty()),
        })
    }

    #[test]
    fn test_well_spread_portfolio_scores_full_marks() {
        let score = score_from_metrics(&metrics(dec!(10), dec!(20), dec!(40), 12));
        assert_eq!(score, 100);
        assert_eq!(DiversificationLevel::from_score(score), DiversificationLevel::Excellent);
    }

    #[test]
    fn test_only_highest_tier_applies() {
        assert_eq!(score_from_metrics(&metrics(dec!(45), dec!(0), dec!(0), 10)), 70);
        assert_eq!(score_from_metrics(&metrics(dec!(30), dec!(0), dec!(0), 10)), 80);
        assert_eq!(score_from_metrics(&metrics(dec!(16), dec!(0), dec!(0), 10)), 90);
        assert_eq!(score_from_metrics(&metrics(dec!(15), dec!(0), dec!(0), 10)), 100);
        assert_eq!(score_from_metrics(&metrics(dec!(0), dec!(51), dec!(0), 10)), 75);
        assert_eq!(score_from_metrics(&metrics(dec!(0), dec!(26), dec!(0), 10)), 95);
        assert_eq!(score_from_metrics(&metrics(dec!(0), dec!(0), dec!(71), 10)), 80);
        assert_eq!(score_from_metrics(&metrics(dec!(0), dec!(0), dec!(0), 2)), 75);
        assert_eq!(score_from_metrics(&metrics(dec!(0), dec!(0), dec!(0), 4)), 90);
    }

    #[test]
    fn test_fully_concentrated_portfolio_bottoms_out() {
        let m = metrics(dec!(100), dec!(100), dec!(100), 1);
        assert_eq!(score_from_metrics(&m), 0);
        assert_eq!(penalties(&m).len(), 4);
    }

    #[test]
    fn test_levels() {
        assert_eq!(DiversificationLevel::from_score(85), DiversificationLevel::Excellent);
        assert_eq!(DiversificationLevel::from_score(70), DiversificationLevel::Good);
        assert_eq!(DiversificationLevel::from_score(50), DiversificationLevel::Fair);
        assert_eq!(DiversificationLevel::from_score(49), DiversificationLevel::Poor);
    }

    #[test]
    fn test_report_for_holdings_ignores_unspecified_sector() {
        let investments = vec![
            holding(dec!(2000), "", "US"),
            holding(dec!(2000), "Technology", "DE"),
            holding(dec!(2000), "Health", "FR"),
            holding(dec!(2000), "Energy", "IT"),
            holding(dec!(2000), "Utilities", "NL"),
        ];
        let report = diversification_score(&investments);

        assert_eq!(report.metrics.largest_holding_percent, dec!(20));
        assert_eq!(report.metrics.largest_sector_percent, dec!(20));
        assert_eq!(report.metrics.largest_country_percent, dec!(20));
        assert_eq!(report.score, 90);
        assert_eq!(report.level, DiversificationLevel::Excellent);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn test_empty_portfolio_scores_zero() {
        let report = diversification_score(&[]);
        assert_eq!(report.score, 0);
        assert_eq!(report.level, DiversificationLevel::Poor);
        assert!(!report.recommendations.is_empty());
    }
}
