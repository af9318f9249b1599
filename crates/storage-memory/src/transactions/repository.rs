use std::sync::Arc;

use async_trait::async_trait;
use finboard_core::investments::Investment;
use finboard_core::transactions::{PositionFold, Transaction, TransactionRepositoryTrait};
use finboard_core::Result;

use crate::db::{MemoryStore, StoreState};
use crate::errors::{IntoCore, StorageError};

const ENTITY: &str = "Transaction";

pub struct TransactionRepository {
    store: Arc<MemoryStore>,
}

impl TransactionRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        TransactionRepository { store }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn list(&self) -> Result<Vec<Transaction>> {
        Ok(self.store.read(|state| state.transactions.clone()))
    }

    fn list_for_investment(&self, investment_id: &str) -> Result<Vec<Transaction>> {
        Ok(self.store.read(|state| {
            state
                .transactions
                .iter()
                .filter(|t| t.investment_id == investment_id)
                .cloned()
                .collect()
        }))
    }

    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        self.store
            .read(|state| {
                state
                    .transactions
                    .iter()
                    .find(|t| t.id == transaction_id)
                    .cloned()
                    .ok_or_else(|| StorageError::not_found(ENTITY, transaction_id))
            })
            .into_core()
    }

    async fn insert_and_fold(
        &self,
        transaction: Transaction,
        fold: &PositionFold,
    ) -> Result<(Transaction, Investment)> {
        self.store.write_core(move |state| {
            if state.transactions.iter().any(|t| t.id == transaction.id) {
                return Err(StorageError::UniqueViolation {
                    entity: ENTITY,
                    id: transaction.id,
                }
                .into());
            }
            let mut history = history_of(state, &transaction.investment_id);
            history.push(transaction.clone());
            let slot = state.investment_mut(&transaction.investment_id).ok_or_else(|| {
                StorageError::ForeignKeyViolation(format!(
                    "transaction {} references unknown investment {}",
                    transaction.id, transaction.investment_id
                ))
            })?;
            *slot = fold(&*slot, &history)?;
            let position = slot.clone();
            state.transactions.push(transaction.clone());
            Ok((transaction, position))
        })
    }

    async fn delete_and_fold(
        &self,
        transaction_id: &str,
        fold: &PositionFold,
    ) -> Result<(Transaction, Investment)> {
        self.store.write_core(|state| {
            let index = state
                .transactions
                .iter()
                .position(|t| t.id == transaction_id)
                .ok_or_else(|| StorageError::not_found(ENTITY, transaction_id))?;
            let removed = state.transactions.remove(index);
            let remaining = history_of(state, &removed.investment_id);
            let slot = state.investment_mut(&removed.investment_id).ok_or_else(|| {
                StorageError::not_found("Investment", removed.investment_id.as_str())
            })?;
            *slot = fold(&*slot, &remaining)?;
            let position = slot.clone();
            Ok((removed, position))
        })
    }
}

/// Ledger of one investment, in insertion order.
fn history_of(state: &StoreState, investment_id: &str) -> Vec<Transaction> {
    state
        .transactions
        .iter()
        .filter(|t| t.investment_id == investment_id)
        .cloned()
        .collect()
}

