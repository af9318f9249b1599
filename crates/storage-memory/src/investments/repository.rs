use std::sync::Arc;

use async_trait::async_trait;
use finboard_core::investments::{Investment, InvestmentChange, InvestmentRepositoryTrait};
use finboard_core::Result;

use crate::db::MemoryStore;
use crate::errors::{IntoCore, StorageError};

const ENTITY: &str = "Investment";

pub struct InvestmentRepository {
    store: Arc<MemoryStore>,
}

impl InvestmentRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        InvestmentRepository { store }
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    fn list(&self) -> Result<Vec<Investment>> {
        Ok(self.store.read(|state| state.investments.clone()))
    }

    fn get_by_id(&self, investment_id: &str) -> Result<Investment> {
        self.store
            .read(|state| {
                state
                    .investments
                    .iter()
                    .find(|i| i.id == investment_id)
                    .cloned()
                    .ok_or_else(|| StorageError::not_found(ENTITY, investment_id))
            })
            .into_core()
    }

    async fn insert(&self, investment: Investment) -> Result<Investment> {
        self.store
            .write(move |state| {
                if state.has_investment(&investment.id) {
                    return Err(StorageError::UniqueViolation {
                        entity: ENTITY,
                        id: investment.id,
                    });
                }
                state.investments.push(investment.clone());
                Ok(investment)
            })
            .into_core()
    }

    async fn update_with(
        &self,
        investment_id: &str,
        change: &InvestmentChange,
    ) -> Result<Investment> {
        self.store.write_core(|state| {
            let slot = state
                .investment_mut(investment_id)
                .ok_or_else(|| StorageError::not_found(ENTITY, investment_id))?;
            change(slot)?;
            Ok(slot.clone())
        })
    }

    async fn delete(&self, investment_id: &str) -> Result<usize> {
        self.store
            .write(|state| {
                let transactions = state
                    .transactions
                    .iter()
                    .filter(|t| t.investment_id == investment_id)
                    .count();
                let plans = state
                    .plans
                    .iter()
                    .filter(|p| p.investment_id == investment_id)
                    .count();
                if transactions > 0 || plans > 0 {
                    return Err(StorageError::ForeignKeyViolation(format!(
                        "investment {} is referenced by {} transaction(s) and {} plan(s)",
                        investment_id, transactions, plans
                    )));
                }
                let before = state.investments.len();
                state.investments.retain(|i| i.id != investment_id);
                Ok(before - state.investments.len())
            })
            .into_core()
    }
}
