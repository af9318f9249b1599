//! Property-based integration tests for the portfolio aggregator and the ledger fold.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::NaiveDate;
use finboard_core::investments::{Investment, NewInvestment};
use finboard_core::portfolio::{
    asset_allocation, rebalancing_plan, score_from_metrics, sector_allocation,
    ConcentrationMetrics, RebalanceAction, TargetAllocation,
};
use finboard_core::transactions::{Position, PositionCalculator, Transaction, TransactionType};
use finboard_core::AssetClass;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Generators
// =============================================================================

/// Generates a random asset class.
fn arb_asset_class() -> impl Strategy<Value = AssetClass> {
    prop::sample::select(AssetClass::ALL.to_vec())
}

/// Generates a positive amount with two decimals.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generates a percentage between 0 and 100 with two decimals.
fn arb_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|bp| Decimal::new(bp, 2))
}

fn investment(
    asset_class: AssetClass,
    quantity: Decimal,
    price: Decimal,
    sector: Option<String>,
) -> Investment {
    Investment::from(NewInvestment {
        name: "Holding".to_string(),
        symbol: asset_class.as_str().to_string(),
        asset_class,
        quantity,
        average_price: price,
        current_price: None,
        fees: Decimal::ZERO,
        currency: "EUR".to_string(),
        sector,
        country: None,
    })
}

/// Generates a holding with a random class, size and optional sector.
fn arb_investment() -> impl Strategy<Value = Investment> {
    (
        arb_asset_class(),
        (1i64..100_000).prop_map(|q| Decimal::new(q, 3)),
        arb_amount(),
        proptest::option::of(prop::sample::select(vec!["Technology", "Health", "Energy"])),
    )
        .prop_map(|(class, quantity, price, sector)| {
            investment(class, quantity, price, sector.map(str::to_string))
        })
}

fn arb_metrics() -> impl Strategy<Value = ConcentrationMetrics> {
    (arb_percent(), arb_percent(), arb_percent(), 0usize..20).prop_map(
        |(holding, sector, country, count)| ConcentrationMetrics {
            largest_holding_percent: holding,
            largest_sector_percent: sector,
            largest_country_percent: country,
            holdings_count: count,
        },
    )
}

fn ledger_entry(day: u32, transaction_type: TransactionType, quantity: Decimal) -> Transaction {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(day as u64);
    Transaction {
        id: format!("tx-{}", day),
        investment_id: "inv-1".to_string(),
        transaction_type,
        quantity,
        price: dec!(10),
        fees: Decimal::ZERO,
        total_amount: quantity * dec!(10),
        date,
        currency: "EUR".to_string(),
        is_from_pac: false,
        pac_plan_id: None,
        notes: None,
        created_at: date.and_hms_opt(0, 0, 0).unwrap(),
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Allocation percentages sum to 100 whenever the portfolio has value.
    #[test]
    fn prop_allocation_percentages_sum_to_hundred(
        investments in proptest::collection::vec(arb_investment(), 1..20)
    ) {
        for slices in [asset_allocation(&investments), sector_allocation(&investments)] {
            let total: Decimal = slices.iter().map(|s| s.percentage).sum();
            prop_assert!(
                (total - dec!(100)).abs() <= dec!(0.0001),
                "percentages summed to {}",
                total
            );
            let count: usize = slices.iter().map(|s| s.count).sum();
            prop_assert_eq!(count, investments.len());
        }
    }

    /// A portfolio without value allocates 0% everywhere.
    #[test]
    fn prop_zero_value_allocates_nothing(
        mut investments in proptest::collection::vec(arb_investment(), 1..10)
    ) {
        for investment in investments.iter_mut() {
            investment.set_price(Decimal::ZERO);
        }
        prop_assert!(asset_allocation(&investments)
            .iter()
            .all(|s| s.percentage.is_zero()));
    }

    /// Value and return caches track every price change.
    #[test]
    fn prop_caches_follow_price(
        mut investment in arb_investment(),
        prices in proptest::collection::vec(arb_amount(), 1..10)
    ) {
        for price in prices {
            investment.set_price(price);
            prop_assert_eq!(investment.current_value, investment.quantity * investment.current_price);
            prop_assert_eq!(
                investment.total_return,
                investment.current_value - investment.total_invested
            );
        }
    }

    /// More concentration never improves the score, which stays within [0, 100].
    #[test]
    fn prop_score_is_monotone_in_concentration(
        base in arb_metrics(),
        extra_holding in arb_percent(),
        extra_sector in arb_percent(),
        extra_country in arb_percent(),
        fewer in 0usize..20
    ) {
        let worse = ConcentrationMetrics {
            largest_holding_percent: (base.largest_holding_percent + extra_holding).min(dec!(100)),
            largest_sector_percent: (base.largest_sector_percent + extra_sector).min(dec!(100)),
            largest_country_percent: (base.largest_country_percent + extra_country).min(dec!(100)),
            holdings_count: base.holdings_count.saturating_sub(fewer),
        };
        let base_score = score_from_metrics(&base);
        let worse_score = score_from_metrics(&worse);
        prop_assert!(worse_score <= base_score);
        prop_assert!(base_score <= 100);
    }

    /// A portfolio sitting exactly on its targets needs no trades.
    #[test]
    fn prop_at_target_holds(total in (100i64..1_000_000).prop_map(Decimal::from)) {
        let investments = vec![
            investment(AssetClass::Etf, Decimal::ONE, total * dec!(0.6), None),
            investment(AssetClass::Bonds, Decimal::ONE, total * dec!(0.3), None),
            investment(AssetClass::Stocks, Decimal::ONE, total * dec!(0.1), None),
        ];
        let plan = rebalancing_plan(&investments, &TargetAllocation::default(), dec!(5));
        prop_assert!(plan.is_balanced);
        prop_assert!(plan.trades.iter().all(|t| t.action == RebalanceAction::Hold && t.amount.is_zero()));
    }

    /// Classes beyond tolerance trade the gap to target; the rest hold.
    #[test]
    fn prop_trades_close_the_gap(
        etf in arb_amount(),
        bonds in arb_amount(),
        stocks in arb_amount(),
        tolerance in (0i64..=10).prop_map(Decimal::from)
    ) {
        let investments = vec![
            investment(AssetClass::Etf, Decimal::ONE, etf, None),
            investment(AssetClass::Bonds, Decimal::ONE, bonds, None),
            investment(AssetClass::Stocks, Decimal::ONE, stocks, None),
        ];
        let plan = rebalancing_plan(&investments, &TargetAllocation::default(), tolerance);
        for trade in &plan.trades {
            let gap = trade.target_percent - trade.current_percent;
            match trade.action {
                RebalanceAction::Buy => {
                    prop_assert!(gap > tolerance);
                    prop_assert_eq!(trade.amount, (gap / dec!(100) * plan.total_value).round_dp(2));
                }
                RebalanceAction::Sell => {
                    prop_assert!(-gap > tolerance);
                    prop_assert_eq!(trade.amount, (-gap / dec!(100) * plan.total_value).round_dp(2));
                }
                RebalanceAction::Hold => {
                    prop_assert!(gap.abs() <= tolerance);
                    prop_assert!(trade.amount.is_zero());
                }
            }
        }
    }

    /// The folded quantity equals opening + acquisitions - disposals.
    #[test]
    fn prop_fold_matches_net_quantity(
        opening in (0i64..1_000).prop_map(Decimal::from),
        moves in proptest::collection::vec((any::<bool>(), 1i64..50), 0..30)
    ) {
        let mut held = opening;
        let mut ledger = Vec::new();
        for (day, (is_buy, qty)) in moves.into_iter().enumerate() {
            let quantity = Decimal::from(qty);
            let transaction_type = if is_buy || quantity > held {
                TransactionType::Buy
            } else {
                TransactionType::Sell
            };
            held = if transaction_type == TransactionType::Buy { held + quantity } else { held - quantity };
            ledger.push(ledger_entry(day as u32, transaction_type, quantity));
        }

        let position = PositionCalculator::calculate(
            Position::new(opening, opening * dec!(10)),
            &ledger,
        ).unwrap();
        prop_assert_eq!(position.quantity, held);
        prop_assert!(position.cost_basis >= Decimal::ZERO);
    }
}
