//! Return calculations over a set of holdings.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DECIMAL_PRECISION;
use crate::investments::Investment;

/// Aggregate return of a set of holdings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSummary {
    pub total_value: Decimal,
    pub total_invested: Decimal,
    /// `total_value - total_invested`
    pub absolute_return: Decimal,
    /// Return relative to the amount invested; 0 when nothing is invested
    pub return_percent: Decimal,
}

/// Absolute and percentage return across `investments`.
pub fn total_return(investments: &[Investment]) -> ReturnSummary {
    let total_value: Decimal = investments.iter().map(|i| i.current_value).sum();
    let total_invested: Decimal = investments.iter().map(|i| i.total_invested).sum();
    let absolute_return = total_value - total_invested;
    let return_percent = if total_invested.is_zero() {
        Decimal::ZERO
    } else {
        (absolute_return / total_invested * Decimal::ONE_HUNDRED).round_dp(DECIMAL_PRECISION)
    };
    ReturnSummary {
        total_value,
        total_invested,
        absolute_return,
        return_percent,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformerSummary {
    pub investment_id: String,
    pub symbol: String,
    pub name: String,
    pub total_return_percent: Decimal,
}

impl From<&Investment> for PerformerSummary {
    fn from(investment: &Investment) -> Self {
        Self {
            investment_id: investment.id.clone(),
            symbol: investment.symbol.clone(),
            name: investment.name.clone(),
            total_return_percent: investment.total_return_percent,
        }
    }
}

/// Headline figures of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub total_invested: Decimal,
    pub total_return: Decimal,
    pub total_return_percent: Decimal,
    pub holdings_count: usize,
    pub asset_class_count: usize,
    pub best_performer: Option<PerformerSummary>,
    pub worst_performer: Option<PerformerSummary>,
}

impl PortfolioSummary {
    pub fn from_investments(investments: &[Investment]) -> Self {
        let returns = total_return(investments);
        let asset_class_count = investments
            .iter()
            .map(|i| i.asset_class)
            .collect::<HashSet<_>>()
            .len();
        let best = investments
            .iter()
            .max_by(|a, b| a.total_return_percent.cmp(&b.total_return_percent));
        let worst = investments
            .iter()
            .min_by(|a, b| a.total_return_percent.cmp(&b.total_return_percent));

        Self {
            total_value: returns.total_value,
            total_invested: returns.total_invested,
            total_return: returns.absolute_return,
            total_return_percent: returns.return_percent,
            holdings_count: investments.len(),
            asset_class_count,
            best_performer: best.map(PerformerSummary::from),
            worst_performer: worst.map(PerformerSummary::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investments::NewInvestment;
    use finboard_market_data::AssetClass;
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, class: AssetClass, cost: Decimal, price: Decimal) -> Investment {
        Investment::from(NewInvestment {
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            asset_class: class,
            quantity: Decimal::ONE,
            average_price: cost,
            current_price: Some(price),
            fees: Decimal::ZERO,
            currency: "EUR".to_string(),
            sector: None,
            country: None,
        })
    }

    #[test]
    fn test_total_return() {
        let investments = vec![
            holding("A", AssetClass::Etf, dec!(1000), dec!(1200)),
            holding("B", AssetClass::Stocks, dec!(1000), dec!(900)),
        ];
        let summary = total_return(&investments);
        assert_eq!(summary.total_value, dec!(2100));
        assert_eq!(summary.total_invested, dec!(2000));
        assert_eq!(summary.absolute_return, dec!(100));
        assert_eq!(summary.return_percent, dec!(5));
    }

    #[test]
    fn test_nothing_invested_means_zero_percent() {
        let mut gifted = holding("A", AssetClass::Crypto, dec!(10), dec!(50));
        gifted.total_invested = Decimal::ZERO;
        gifted.recalculate();

        let summary = total_return(&[gifted]);
        assert_eq!(summary.absolute_return, dec!(50));
        assert_eq!(summary.return_percent, Decimal::ZERO);
        assert_eq!(total_return(&[]), ReturnSummary::default());
    }

    #[test]
    fn test_summary_picks_best_and_worst() {
        let investments = vec![
            holding("UP", AssetClass::Etf, dec!(100), dec!(150)),
            holding("FLAT", AssetClass::Etf, dec!(100), dec!(100)),
            holding("DOWN", AssetClass::Crypto, dec!(100), dec!(40)),
        ];
        let summary = PortfolioSummary::from_investments(&investments);
        assert_eq!(summary.holdings_count, 3);
        assert_eq!(summary.asset_class_count, 2);
        assert_eq!(summary.best_performer.unwrap().symbol, "UP");
        assert_eq!(summary.worst_performer.unwrap().symbol, "DOWN");

        let empty = PortfolioSummary::from_investments(&[]);
        assert!(empty.best_performer.is_none());
        assert_eq!(empty.total_return_percent, Decimal::ZERO);
    }
}
