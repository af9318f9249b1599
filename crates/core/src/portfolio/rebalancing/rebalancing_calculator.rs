//! Computes the trades that bring each asset class back within tolerance of its target.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{RebalanceAction, RebalanceTrade, RebalancingPlan, TargetAllocation};
use crate::constants::{DECIMAL_PRECISION, DISPLAY_DECIMAL_PRECISION};
use crate::investments::Investment;
use finboard_market_data::AssetClass;

/// Broker fee as a share of the traded amount.
pub const TRADE_COST_RATE: Decimal = dec!(0.001);
/// Minimum fee charged per trade.
pub const MIN_TRADE_COST: Decimal = dec!(2.95);

/// Estimated fee for one trade of `amount`.
pub fn trade_cost(amount: Decimal) -> Decimal {
    (amount * TRADE_COST_RATE)
        .max(MIN_TRADE_COST)
        .round_dp(DISPLAY_DECIMAL_PRECISION)
}

/// Rough settlement time for `trade_count` orders.
pub fn estimate_execution_time(trade_count: usize) -> &'static str {
    match trade_count {
        0 => "No action needed",
        1..=2 => "~1 day",
        3..=5 => "2-3 days",
        _ => "~1 week",
    }
}

/// Compares current class weights with `targets` and proposes BUY/SELL/HOLD per class.
///
/// Every class that is either held or targeted gets a row. A class whose
/// deviation is within `tolerance` percentage points is held. A portfolio
/// without value holds everything.
pub fn rebalancing_plan(
    investments: &[Investment],
    targets: &TargetAllocation,
    tolerance: Decimal,
) -> RebalancingPlan {
    let total_value: Decimal = investments.iter().map(|i| i.current_value).sum();

    let mut class_values: BTreeMap<AssetClass, Decimal> = BTreeMap::new();
    for investment in investments {
        *class_values
            .entry(investment.asset_class)
            .or_insert(Decimal::ZERO) += investment.current_value;
    }
    let classes: BTreeSet<AssetClass> = class_values
        .keys()
        .chain(targets.targets.keys())
        .copied()
        .collect();

    let trades: Vec<RebalanceTrade> = classes
        .into_iter()
        .map(|asset_class| {
            let current_value = class_values
                .get(&asset_class)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let current_percent = if total_value > Decimal::ZERO {
                (current_value / total_value * Decimal::ONE_HUNDRED).round_dp(DECIMAL_PRECISION)
            } else {
                Decimal::ZERO
            };
            let target_percent = targets.target_for(asset_class);
            let deviation = current_percent - target_percent;

            let action = if total_value <= Decimal::ZERO {
                RebalanceAction::Hold
            } else if deviation < -tolerance {
                RebalanceAction::Buy
            } else if deviation > tolerance {
                RebalanceAction::Sell
            } else {
                RebalanceAction::Hold
            };
            let (amount, estimated_cost) = match action {
                RebalanceAction::Hold => (Decimal::ZERO, Decimal::ZERO),
                _ => {
                    let amount = (deviation.abs() / Decimal::ONE_HUNDRED * total_value)
                        .round_dp(DISPLAY_DECIMAL_PRECISION);
                    (amount, trade_cost(amount))
                }
            };

            RebalanceTrade {
                asset_class,
                current_value,
                current_percent,
                target_percent,
                deviation,
                action,
                amount,
                estimated_cost,
            }
        })
        .collect();

    let sum_for = |action: RebalanceAction| -> Decimal {
        trades
            .iter()
            .filter(|t| t.action == action)
            .map(|t| t.amount)
            .sum()
    };
    let total_buy = sum_for(RebalanceAction::Buy);
    let total_sell = sum_for(RebalanceAction::Sell);
    let trade_count = trades
        .iter()
        .filter(|t| t.action != RebalanceAction::Hold)
        .count();
    let estimated_costs: Decimal = trades.iter().map(|t| t.estimated_cost).sum();

    debug!(
        "Rebalancing {} across {} class(es): {} trade(s), buy {} / sell {}",
        total_value,
        trades.len(),
        trade_count,
        total_buy,
        total_sell
    );

    RebalancingPlan {
        total_value,
        tolerance,
        trade_count,
        total_buy,
        total_sell,
        estimated_costs,
        time_estimate: estimate_execution_time(trade_count).to_string(),
        is_balanced: trade_count == 0,
        trades,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investments::NewInvestment;

    fn holding(class: AssetClass, value: Decimal) -> Investment {
        Investment::from(NewInvestment {
            name: "Holding".to_string(),
            symbol: "SYM".to_string(),
            asset_class: class,
            quantity: Decimal::ONE,
            average_price: value,
            current_price: None,
            fees: Decimal::ZERO,
            currency: "EUR".to_string(),
            sector: None,
            country: None,
        })
    }

    fn trade_for(plan: &RebalancingPlan, class: AssetClass) -> &RebalanceTrade {
        plan.trades.iter().find(|t| t.asset_class == class).unwrap()
    }

    #[test]
    fn test_portfolio_at_target_holds_everything() {
        let investments = vec![
            holding(AssetClass::Etf, dec!(6000)),
            holding(AssetClass::Bonds, dec!(3000)),
            holding(AssetClass::Stocks, dec!(1000)),
        ];
        let plan = rebalancing_plan(&investments, &TargetAllocation::default(), dec!(5));

        assert!(plan.is_balanced);
        assert_eq!(plan.time_estimate, "No action needed");
        assert!(plan
            .trades
            .iter()
            .all(|t| t.action == RebalanceAction::Hold && t.amount.is_zero()));
    }

    #[test]
    fn test_under_target_class_is_bought() {
        // ETF 70%, Bonds 20%, Stocks 10% against 60/30/10
        let investments = vec![
            holding(AssetClass::Etf, dec!(7000)),
            holding(AssetClass::Bonds, dec!(2000)),
            holding(AssetClass::Stocks, dec!(1000)),
        ];
        let plan = rebalancing_plan(&investments, &TargetAllocation::default(), dec!(5));

        let bonds = trade_for(&plan, AssetClass::Bonds);
        assert_eq!(bonds.action, RebalanceAction::Buy);
        assert_eq!(bonds.amount, dec!(1000));
        assert_eq!(bonds.estimated_cost, dec!(2.95));

        let etf = trade_for(&plan, AssetClass::Etf);
        assert_eq!(etf.action, RebalanceAction::Sell);
        assert_eq!(etf.amount, dec!(1000));
        assert_eq!(etf.deviation, dec!(10));

        assert_eq!(trade_for(&plan, AssetClass::Stocks).action, RebalanceAction::Hold);
        assert_eq!(plan.trade_count, 2);
        assert_eq!(plan.time_estimate, "~1 day");
        assert_eq!(plan.estimated_costs, dec!(5.90));
    }

    #[test]
    fn test_deviation_within_tolerance_is_held() {
        let investments = vec![
            holding(AssetClass::Etf, dec!(6400)),
            holding(AssetClass::Bonds, dec!(2600)),
            holding(AssetClass::Stocks, dec!(1000)),
        ];
        let plan = rebalancing_plan(&investments, &TargetAllocation::default(), dec!(5));
        assert!(plan.is_balanced);
    }

    #[test]
    fn test_untargeted_class_is_sold_off() {
        let investments = vec![
            holding(AssetClass::Etf, dec!(6000)),
            holding(AssetClass::Bonds, dec!(3000)),
            holding(AssetClass::Crypto, dec!(1000)),
        ];
        let plan = rebalancing_plan(&investments, &TargetAllocation::default(), dec!(5));

        let crypto = trade_for(&plan, AssetClass::Crypto);
        assert_eq!(crypto.target_percent, Decimal::ZERO);
        assert_eq!(crypto.action, RebalanceAction::Sell);
        assert_eq!(crypto.amount, dec!(1000));
        let stocks = trade_for(&plan, AssetClass::Stocks);
        assert_eq!(stocks.action, RebalanceAction::Buy);
        assert_eq!(stocks.current_value, Decimal::ZERO);
    }

    #[test]
    fn test_large_trade_cost_scales_with_amount() {
        assert_eq!(trade_cost(dec!(10000)), dec!(10));
        assert_eq!(trade_cost(dec!(100)), dec!(2.95));
    }

    #[test]
    fn test_time_estimates() {
        assert_eq!(estimate_execution_time(0), "No action needed");
        assert_eq!(estimate_execution_time(2), "~1 day");
        assert_eq!(estimate_execution_time(5), "2-3 days");
        assert_eq!(estimate_execution_time(6), "~1 week");
    }

    #[test]
    fn test_empty_portfolio_holds() {
        let plan = rebalancing_plan(&[], &TargetAllocation::default(), dec!(5));
        assert_eq!(plan.trades.len(), 3);
        assert!(plan.is_balanced);
        assert_eq!(plan.total_value, Decimal::ZERO);
    }
}
