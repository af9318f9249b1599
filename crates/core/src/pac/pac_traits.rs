//! Recurring plan repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::pac_model::{NewRecurringPlan, PlanExecution, RecurringPlan, RecurringPlanUpdate};
use crate::errors::Result;

/// Trait defining the contract for recurring plan storage.
#[async_trait]
pub trait RecurringPlanRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<RecurringPlan>>;

    fn get_by_id(&self, plan_id: &str) -> Result<RecurringPlan>;

    async fn insert(&self, plan: RecurringPlan) -> Result<RecurringPlan>;

    async fn update(&self, plan: RecurringPlan) -> Result<RecurringPlan>;

    /// Returns the number of deleted records.
    async fn delete(&self, plan_id: &str) -> Result<usize>;
}

/// Trait defining the contract for recurring plan operations.
///
/// Operations that touch the schedule take `today` so the next payment date
/// is always computed against an explicit calendar day.
#[async_trait]
pub trait RecurringPlanServiceTrait: Send + Sync {
    async fn create_plan(&self, new_plan: NewRecurringPlan, today: NaiveDate)
        -> Result<RecurringPlan>;

    async fn update_plan(
        &self,
        plan_update: RecurringPlanUpdate,
        today: NaiveDate,
    ) -> Result<RecurringPlan>;

    async fn pause_plan(&self, plan_id: &str) -> Result<RecurringPlan>;

    async fn resume_plan(&self, plan_id: &str, today: NaiveDate) -> Result<RecurringPlan>;

    async fn delete_plan(&self, plan_id: &str) -> Result<()>;

    fn get_plans(&self) -> Result<Vec<RecurringPlan>>;

    fn get_plan(&self, plan_id: &str) -> Result<RecurringPlan>;

    /// Active, unpaused plans whose next payment is on or before `today`.
    fn due_plans(&self, today: NaiveDate) -> Result<Vec<RecurringPlan>>;

    /// Buys `monthly_amount` worth of the linked holding at its current price.
    async fn execute_payment(&self, plan_id: &str, today: NaiveDate) -> Result<PlanExecution>;

    /// Executes every due plan; a failing plan is logged and skipped.
    async fn process_due_payments(&self, today: NaiveDate) -> Result<Vec<PlanExecution>>;
}
