use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::pac_model::{NewRecurringPlan, PlanExecution, RecurringPlan, RecurringPlanUpdate};
use super::pac_traits::{RecurringPlanRepositoryTrait, RecurringPlanServiceTrait};
use crate::constants::QUANTITY_PRECISION;
use crate::errors::{CalculatorError, Error, Result};
use crate::investments::InvestmentServiceTrait;
use crate::transactions::{NewTransaction, TransactionServiceTrait, TransactionType};

/// Service for managing recurring plans and executing their payments
pub struct RecurringPlanService {
    repository: Arc<dyn RecurringPlanRepositoryTrait>,
    investment_service: Arc<dyn InvestmentServiceTrait>,
    transaction_service: Arc<dyn TransactionServiceTrait>,
}

impl RecurringPlanService {
    pub fn new(
        repository: Arc<dyn RecurringPlanRepositoryTrait>,
        investment_service: Arc<dyn InvestmentServiceTrait>,
        transaction_service: Arc<dyn TransactionServiceTrait>,
    ) -> Self {
        Self {
            repository,
            investment_service,
            transaction_service,
        }
    }

    fn get_running_plan(&self, plan_id: &str) -> Result<RecurringPlan> {
        let plan = self.repository.get_by_id(plan_id)?;
        if !plan.is_active {
            return Err(Error::ConstraintViolation(format!(
                "Plan {} for {} is no longer active",
                plan.id, plan.symbol
            )));
        }
        Ok(plan)
    }
}

#[async_trait]
impl RecurringPlanServiceTrait for RecurringPlanService {
    async fn create_plan(
        &self,
        new_plan: NewRecurringPlan,
        today: NaiveDate,
    ) -> Result<RecurringPlan> {
        if let Err(e) = new_plan.validate() {
            warn!("Rejected new plan for {}: {}", new_plan.investment_id, e);
            return Err(e);
        }
        let investment = self
            .investment_service
            .get_investment(&new_plan.investment_id)?;
        let plan = RecurringPlan::new(new_plan, &investment, today)?;
        debug!(
            "Creating {:?} plan of {} on {}; first payment {}",
            plan.frequency, plan.monthly_amount, plan.symbol, plan.next_payment_date
        );
        self.repository.insert(plan).await
    }

    async fn update_plan(
        &self,
        plan_update: RecurringPlanUpdate,
        today: NaiveDate,
    ) -> Result<RecurringPlan> {
        let mut plan = self.repository.get_by_id(&plan_update.id)?;
        if let Err(e) = plan_update.validate(plan.start_date) {
            warn!("Rejected update of plan {}: {}", plan.id, e);
            return Err(e);
        }
        plan_update.apply_to(&mut plan);
        plan.reschedule(today)?;
        plan.is_active = !plan.is_finished();
        self.repository.update(plan).await
    }

    async fn pause_plan(&self, plan_id: &str) -> Result<RecurringPlan> {
        let mut plan = self.get_running_plan(plan_id)?;
        if plan.is_paused {
            return Ok(plan);
        }
        plan.is_paused = true;
        plan.updated_at = Utc::now().naive_utc();
        info!("Paused plan {} for {}", plan.id, plan.symbol);
        self.repository.update(plan).await
    }

    async fn resume_plan(&self, plan_id: &str, today: NaiveDate) -> Result<RecurringPlan> {
        let mut plan = self.get_running_plan(plan_id)?;
        if !plan.is_paused {
            return Ok(plan);
        }
        plan.is_paused = false;
        // Slots missed while paused are skipped
        if plan.next_payment_date <= today {
            plan.reschedule(today)?;
            plan.is_active = !plan.is_finished();
        }
        plan.updated_at = Utc::now().naive_utc();
        info!(
            "Resumed plan {} for {}; next payment {}",
            plan.id, plan.symbol, plan.next_payment_date
        );
        self.repository.update(plan).await
    }

    async fn delete_plan(&self, plan_id: &str) -> Result<()> {
        let deleted = self.repository.delete(plan_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Recurring plan {}", plan_id)));
        }
        Ok(())
    }

    fn get_plans(&self) -> Result<Vec<RecurringPlan>> {
        self.repository.list()
    }

    fn get_plan(&self, plan_id: &str) -> Result<RecurringPlan> {
        self.repository.get_by_id(plan_id)
    }

    fn due_plans(&self, today: NaiveDate) -> Result<Vec<RecurringPlan>> {
        Ok(self
            .repository
            .list()?
            .into_iter()
            .filter(|plan| plan.is_due(today))
            .collect())
    }

    async fn execute_payment(&self, plan_id: &str, today: NaiveDate) -> Result<PlanExecution> {
        let mut plan = self.get_running_plan(plan_id)?;
        if plan.is_paused {
            warn!("Refusing to execute paused plan {} ({})", plan.id, plan.symbol);
            return Err(Error::ConstraintViolation(format!(
                "Plan {} for {} is paused",
                plan.id, plan.symbol
            )));
        }
        if plan.is_finished() || plan.is_past_end(today) {
            warn!(
                "Refusing to execute plan {} ({}) on {}: past its end",
                plan.id, plan.symbol, today
            );
            return Err(Error::ConstraintViolation(format!(
                "Plan {} for {} has no payment left on {}",
                plan.id, plan.symbol, today
            )));
        }

        let investment = self.investment_service.get_investment(&plan.investment_id)?;
        if investment.current_price <= Decimal::ZERO {
            return Err(CalculatorError::PriceUnavailable(investment.symbol).into());
        }
        let quantity = (plan.monthly_amount / investment.current_price).round_dp(QUANTITY_PRECISION);
        if quantity.is_zero() {
            return Err(Error::invalid_input(format!(
                "Plan amount {} buys no units of {} at {}",
                plan.monthly_amount, investment.symbol, investment.current_price
            )));
        }

        let transaction = self
            .transaction_service
            .add_transaction(NewTransaction {
                investment_id: investment.id.clone(),
                transaction_type: TransactionType::PacPayment,
                quantity,
                price: investment.current_price,
                fees: Decimal::ZERO,
                date: today,
                currency: investment.currency.clone(),
                pac_plan_id: Some(plan.id.clone()),
                notes: Some(format!("Recurring payment #{}", plan.executed_payments + 1)),
            })
            .await?;

        plan.record_payment(&transaction, today)?;
        let completed = !plan.is_active;
        let plan = match self.repository.update(plan).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(
                    "Plan {} could not record payment {}: {}; removing it from the ledger",
                    plan_id, transaction.id, e
                );
                if let Err(revert) = self
                    .transaction_service
                    .delete_transaction(&transaction.id)
                    .await
                {
                    error!(
                        "Payment {} stays in the ledger without plan {}: {}",
                        transaction.id, plan_id, revert
                    );
                }
                return Err(e);
            }
        };
        info!(
            "Executed plan {} for {}: {} units at {}; next payment {}",
            plan.id, plan.symbol, transaction.quantity, transaction.price, plan.next_payment_date
        );
        if completed {
            info!("Plan {} for {} completed", plan.id, plan.symbol);
        }
        Ok(PlanExecution {
            plan,
            transaction,
            completed,
        })
    }

    async fn process_due_payments(&self, today: NaiveDate) -> Result<Vec<PlanExecution>> {
        let due = self.due_plans(today)?;
        let mut executions = Vec::with_capacity(due.len());
        for plan in due {
            match self.execute_payment(&plan.id, today).await {
                Ok(execution) => executions.push(execution),
                Err(e) => warn!("Skipping due plan {} ({}): {}", plan.id, plan.symbol, e),
            }
        }
        debug!("Processed {} due plan payment(s) on {}", executions.len(), today);
        Ok(executions)
    }
}
