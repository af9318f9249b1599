//! Recurring investment plan (PAC) domain models.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::{next_payment_date, MAX_PLAN_DAY};
use crate::investments::Investment;
use crate::transactions::Transaction;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanFrequency {
    #[default]
    Monthly,
    Quarterly,
    Biannual,
}

impl PlanFrequency {
    /// Months between two payments.
    pub fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Biannual => 6,
        }
    }

    pub fn payments_per_year(&self) -> u32 {
        12 / self.months()
    }
}

/// Domain model representing a recurring purchase of one holding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPlan {
    pub id: String,
    pub investment_id: String,
    pub symbol: String,
    pub name: String,
    /// Amount invested per payment
    pub monthly_amount: Decimal,
    pub frequency: PlanFrequency,
    pub day_of_month: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub target_amount: Option<Decimal>,
    pub is_active: bool,
    pub is_paused: bool,
    pub executed_payments: u32,
    pub total_invested: Decimal,
    pub last_execution: Option<NaiveDate>,
    pub next_payment_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl RecurringPlan {
    /// Builds a plan for `investment`, scheduling the first payment after `today`.
    pub fn new(new: NewRecurringPlan, investment: &Investment, today: NaiveDate) -> Result<Self> {
        let now = Utc::now().naive_utc();
        let mut plan = Self {
            id: Uuid::new_v4().to_string(),
            investment_id: investment.id.clone(),
            symbol: investment.symbol.clone(),
            name: investment.name.clone(),
            monthly_amount: new.monthly_amount,
            frequency: new.frequency,
            day_of_month: new.day_of_month,
            start_date: new.start_date,
            end_date: new.end_date,
            target_amount: new.target_amount,
            is_active: true,
            is_paused: false,
            executed_payments: 0,
            total_invested: Decimal::ZERO,
            last_execution: None,
            next_payment_date: new.start_date,
            created_at: now,
            updated_at: now,
        };
        plan.reschedule(today)?;
        if plan.is_finished() {
            return Err(Error::invalid_input(format!(
                "No payment fits before the end date; the first would be on {}",
                plan.next_payment_date
            )));
        }
        Ok(plan)
    }

    /// Recomputes `next_payment_date` relative to `today`.
    pub fn reschedule(&mut self, today: NaiveDate) -> Result<()> {
        self.next_payment_date = next_payment_date(
            self.frequency,
            self.day_of_month,
            self.start_date,
            self.last_execution,
            today,
        )
        .ok_or_else(|| {
            Error::invalid_input(format!("No payment date can follow {} for plan {}", today, self.id))
        })?;
        Ok(())
    }

    /// Whether a payment should run on `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.is_active
            && !self.is_paused
            && self.next_payment_date <= today
            && !self.is_finished()
            && !self.is_past_end(today)
    }

    /// Whether `day` falls after the end date.
    pub fn is_past_end(&self, day: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| day > end)
    }

    /// Whether the plan has reached its target or run past its end date.
    pub fn is_finished(&self) -> bool {
        let target_reached = self
            .target_amount
            .is_some_and(|target| self.total_invested >= target);
        target_reached || self.is_past_end(self.next_payment_date)
    }

    /// Books an executed payment and advances the schedule.
    pub fn record_payment(&mut self, transaction: &Transaction, today: NaiveDate) -> Result<()> {
        self.executed_payments += 1;
        self.total_invested += transaction.total_amount;
        self.last_execution = Some(today);
        self.reschedule(today)?;
        if self.is_finished() {
            self.is_active = false;
        }
        self.updated_at = Utc::now().naive_utc();
        Ok(())
    }
}

/// Input model for creating a recurring plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringPlan {
    pub investment_id: String,
    pub monthly_amount: Decimal,
    #[serde(default)]
    pub frequency: PlanFrequency,
    pub day_of_month: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub target_amount: Option<Decimal>,
}

impl NewRecurringPlan {
    pub fn validate(&self) -> Result<()> {
        if self.investment_id.trim().is_empty() {
            return Err(Error::missing_field("investmentId"));
        }
        validate_terms(
            self.monthly_amount,
            self.day_of_month,
            self.start_date,
            self.end_date,
            self.target_amount,
        )
    }
}

/// Input model for changing the terms of a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPlanUpdate {
    pub id: String,
    pub monthly_amount: Decimal,
    pub frequency: PlanFrequency,
    pub day_of_month: u32,
    pub end_date: Option<NaiveDate>,
    pub target_amount: Option<Decimal>,
}

impl RecurringPlanUpdate {
    pub fn validate(&self, start_date: NaiveDate) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::missing_field("id"));
        }
        validate_terms(
            self.monthly_amount,
            self.day_of_month,
            start_date,
            self.end_date,
            self.target_amount,
        )
    }

    pub fn apply_to(self, plan: &mut RecurringPlan) {
        plan.monthly_amount = self.monthly_amount;
        plan.frequency = self.frequency;
        plan.day_of_month = self.day_of_month;
        plan.end_date = self.end_date;
        plan.target_amount = self.target_amount;
        plan.updated_at = Utc::now().naive_utc();
    }
}

fn validate_terms(
    amount: Decimal,
    day_of_month: u32,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    target_amount: Option<Decimal>,
) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_input("Plan amount must be greater than zero"));
    }
    if !(1..=MAX_PLAN_DAY).contains(&day_of_month) {
        return Err(Error::invalid_input(format!(
            "Day of month must be between 1 and {}",
            MAX_PLAN_DAY
        )));
    }
    match (end_date, target_amount) {
        (Some(_), Some(_)) => Err(Error::invalid_input(
            "A plan ends on either an end date or a target amount, not both",
        )),
        (None, None) => Err(Error::invalid_input(
            "A plan needs an end date or a target amount",
        )),
        (Some(end), None) if end <= start_date => Err(Error::invalid_input(
            "End date must be after the start date",
        )),
        (None, Some(target)) if target <= Decimal::ZERO => Err(Error::invalid_input(
            "Target amount must be greater than zero",
        )),
        _ => Ok(()),
    }
}

/// Outcome of one executed plan payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanExecution {
    pub plan: RecurringPlan,
    pub transaction: Transaction,
    /// The payment completed the plan
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_plan() -> NewRecurringPlan {
        NewRecurringPlan {
            investment_id: "inv-1".to_string(),
            monthly_amount: dec!(300),
            frequency: PlanFrequency::Monthly,
            day_of_month: 10,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            target_amount: Some(dec!(3600)),
        }
    }

    #[test]
    fn test_exactly_one_termination_rule() {
        assert!(new_plan().validate().is_ok());

        let mut both = new_plan();
        both.end_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        assert!(both.validate().is_err());

        let mut neither = new_plan();
        neither.target_amount = None;
        assert!(neither.validate().is_err());

        let mut by_date = new_plan();
        by_date.target_amount = None;
        by_date.end_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        assert!(by_date.validate().is_ok());
    }

    #[test]
    fn test_day_of_month_and_amount_bounds() {
        let mut plan = new_plan();
        plan.day_of_month = 29;
        assert!(plan.validate().is_err());
        plan.day_of_month = 0;
        assert!(plan.validate().is_err());

        let mut plan = new_plan();
        plan.monthly_amount = Decimal::ZERO;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_frequency_cadence() {
        assert_eq!(PlanFrequency::Monthly.payments_per_year(), 12);
        assert_eq!(PlanFrequency::Quarterly.payments_per_year(), 4);
        assert_eq!(PlanFrequency::Biannual.payments_per_year(), 2);
    }
}
