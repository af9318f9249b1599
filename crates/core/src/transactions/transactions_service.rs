use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;

use super::position_calculator::PositionCalculator;
use super::transactions_model::{NewTransaction, Transaction};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::errors::{Error, Result};
use crate::investments::{Investment, InvestmentServiceTrait};

/// Service for recording and removing ledger entries
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    investment_service: Arc<dyn InvestmentServiceTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        investment_service: Arc<dyn InvestmentServiceTrait>,
    ) -> Self {
        Self {
            repository,
            investment_service,
        }
    }

    /// Folds `transactions` onto the investment's opening position at its latest price.
    fn refold(investment: &Investment, transactions: &[Transaction]) -> Result<Investment> {
        let position = PositionCalculator::calculate(investment.opening_position(), transactions)?;
        let mut refolded = investment.clone();
        refolded.apply_position(&position);
        refolded.updated_at = Utc::now().naive_utc();
        Ok(refolded)
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        if let Err(e) = new_transaction.validate() {
            warn!("Rejected transaction: {}", e);
            return Err(e);
        }
        let investment = self
            .investment_service
            .get_investment(&new_transaction.investment_id)?;

        let transaction = Transaction::from(new_transaction);
        let currency = transaction.currency.clone();
        let fold = move |holding: &Investment, history: &[Transaction]| -> Result<Investment> {
            if !holding.currency.eq_ignore_ascii_case(&currency) {
                return Err(Error::invalid_input(format!(
                    "Transaction currency {} does not match investment currency {}",
                    currency, holding.currency
                )));
            }
            TransactionService::refold(holding, history)
        };
        // A rejected fold rolls back the insert too
        let (stored, saved) = self
            .repository
            .insert_and_fold(transaction, &fold)
            .await
            .map_err(|e| {
                warn!("Rejected transaction for {}: {}", investment.symbol, e);
                e
            })?;
        debug!(
            "Recorded {:?} of {} {} at {}; position now {}",
            stored.transaction_type, stored.quantity, saved.symbol, stored.price, saved.quantity
        );
        Ok(stored)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let (removed, saved) = self
            .repository
            .delete_and_fold(transaction_id, &TransactionService::refold)
            .await
            .map_err(|e| {
                warn!("Cannot delete transaction {}: {}", transaction_id, e);
                e
            })?;
        debug!(
            "Deleted transaction {} of {}; position now {}",
            transaction_id, saved.symbol, saved.quantity
        );
        Ok(removed)
    }

    fn get_transactions(&self) -> Result<Vec<Transaction>> {
        self.repository.list()
    }

    fn get_transactions_for_investment(&self, investment_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list_for_investment(investment_id)
    }
}
