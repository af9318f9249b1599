use std::sync::Arc;

use async_trait::async_trait;
use finboard_core::pac::{RecurringPlan, RecurringPlanRepositoryTrait};
use finboard_core::Result;

use crate::db::MemoryStore;
use crate::errors::{IntoCore, StorageError};

const ENTITY: &str = "Recurring plan";

pub struct RecurringPlanRepository {
    store: Arc<MemoryStore>,
}

impl RecurringPlanRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        RecurringPlanRepository { store }
    }
}

#[async_trait]
impl RecurringPlanRepositoryTrait for RecurringPlanRepository {
    fn list(&self) -> Result<Vec<RecurringPlan>> {
        Ok(self.store.read(|state| state.plans.clone()))
    }

    fn get_by_id(&self, plan_id: &str) -> Result<RecurringPlan> {
        self.store
            .read(|state| {
                state
                    .plans
                    .iter()
                    .find(|p| p.id == plan_id)
                    .cloned()
                    .ok_or_else(|| StorageError::not_found(ENTITY, plan_id))
            })
            .into_core()
    }

    async fn insert(&self, plan: RecurringPlan) -> Result<RecurringPlan> {
        self.store
            .write(move |state| {
                if !state.has_investment(&plan.investment_id) {
                    return Err(StorageError::ForeignKeyViolation(format!(
                        "recurring plan {} references unknown investment {}",
                        plan.id, plan.investment_id
                    )));
                }
                if state.plans.iter().any(|p| p.id == plan.id) {
                    return Err(StorageError::UniqueViolation {
                        entity: ENTITY,
                        id: plan.id,
                    });
                }
                state.plans.push(plan.clone());
                Ok(plan)
            })
            .into_core()
    }

    async fn update(&self, plan: RecurringPlan) -> Result<RecurringPlan> {
        self.store
            .write(move |state| {
                let slot = state
                    .plans
                    .iter_mut()
                    .find(|p| p.id == plan.id)
                    .ok_or_else(|| StorageError::not_found(ENTITY, plan.id.as_str()))?;
                *slot = plan.clone();
                Ok(plan)
            })
            .into_core()
    }

    async fn delete(&self, plan_id: &str) -> Result<usize> {
        self.store
            .write(|state| {
                let before = state.plans.len();
                state.plans.retain(|p| p.id != plan_id);
                Ok(before - state.plans.len())
            })
            .into_core()
    }
}
