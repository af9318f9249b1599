//! Folds a holding's ledger into quantity and cost basis.
//!
//! Average-cost method: acquisitions add `qty * price + fees` to the cost
//! basis; a sell removes cost in proportion to the quantity sold. Sell fees
//! are not capitalised.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transactions_model::Transaction;
use crate::constants::{DECIMAL_PRECISION, QUANTITY_PRECISION};
use crate::errors::CalculatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

impl Position {
    pub fn new(quantity: Decimal, cost_basis: Decimal) -> Self {
        Self {
            quantity,
            cost_basis,
        }
    }

    pub fn average_price(&self) -> Decimal {
        if self.quantity.is_zero() {
            Decimal::ZERO
        } else {
            (self.cost_basis / self.quantity).round_dp(DECIMAL_PRECISION)
        }
    }

    fn acquire(&mut self, transaction: &Transaction) {
        self.quantity += transaction.quantity;
        self.cost_basis += transaction.quantity * transaction.price + transaction.fees;
    }

    fn dispose(&mut self, transaction: &Transaction) -> Result<(), CalculatorError> {
        if transaction.quantity > self.quantity {
            return Err(CalculatorError::InsufficientQuantity {
                investment_id: transaction.investment_id.clone(),
                held: self.quantity,
                requested: transaction.quantity,
            });
        }
        if transaction.quantity == self.quantity {
            self.quantity = Decimal::ZERO;
            self.cost_basis = Decimal::ZERO;
            return Ok(());
        }
        let cost_removed = (self.cost_basis * transaction.quantity / self.quantity)
            .round_dp(DECIMAL_PRECISION);
        self.quantity = (self.quantity - transaction.quantity).round_dp(QUANTITY_PRECISION);
        self.cost_basis -= cost_removed;
        Ok(())
    }
}

pub struct PositionCalculator;

impl PositionCalculator {
    /// Folds `transactions` on top of `opening`, in date order (ties by creation time).
    pub fn calculate(
        opening: Position,
        transactions: &[Transaction],
    ) -> Result<Position, CalculatorError> {
        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

        let mut position = opening;
        for transaction in ordered {
            if transaction.quantity <= Decimal::ZERO {
                return Err(CalculatorError::InvalidTransaction(format!(
                    "transaction {} has non-positive quantity {}",
                    transaction.id, transaction.quantity
                )));
            }
            if transaction.transaction_type.is_acquisition() {
                position.acquire(transaction);
            } else {
                position.dispose(transaction)?;
            }
        }
        debug!(
            "Folded {} transaction(s) into quantity {} / cost {}",
            transactions.len(),
            position.quantity,
            position.cost_basis
        );
        Ok(position)
    }
}
