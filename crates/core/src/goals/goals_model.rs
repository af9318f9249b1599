//! Goals domain models.

use chrono::{Months, NaiveDate, NaiveDateTime, Utc};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::{Error, Result};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalPriority {
    High,
    #[default]
    Medium,
    Low,
}

/// Domain model representing a savings goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    /// Never clamped; amounts above the target are reported as overflow
    pub current_amount: Decimal,
    pub target_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub priority: GoalPriority,
    pub category: String,
    pub monthly_contribution: Option<Decimal>,
    pub is_completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Goal {
    pub fn validate(&self) -> Result<()> {
        validate_amounts(
            &self.name,
            self.current_amount,
            self.target_amount,
            self.monthly_contribution,
        )
    }

    /// Marks the goal completed once funded. A completed goal stays completed.
    pub fn refresh_completion(&mut self) {
        if self.current_amount >= self.target_amount {
            self.is_completed = true;
        }
    }

    pub fn progress(&self, today: NaiveDate) -> GoalProgress {
        GoalProgress::for_goal(self, today)
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: GoalPriority,
    #[serde(default)]
    pub category: String,
    pub monthly_contribution: Option<Decimal>,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        validate_amounts(
            &self.name,
            self.current_amount,
            self.target_amount,
            self.monthly_contribution,
        )
    }
}

impl From<NewGoal> for Goal {
    fn from(new: NewGoal) -> Self {
        let now = Utc::now().naive_utc();
        let category = new.category.trim();
        let mut goal = Self {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            current_amount: new.current_amount,
            target_amount: new.target_amount,
            deadline: new.deadline,
            priority: new.priority,
            category: if category.is_empty() {
                "General".to_string()
            } else {
                category.to_string()
            },
            monthly_contribution: new.monthly_contribution,
            is_completed: false,
            created_at: now,
            updated_at: now,
        };
        goal.refresh_completion();
        goal
    }
}

fn validate_amounts(
    name: &str,
    current_amount: Decimal,
    target_amount: Decimal,
    monthly_contribution: Option<Decimal>,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::missing_field("name"));
    }
    if target_amount <= Decimal::ZERO {
        return Err(Error::invalid_input("Target amount must be greater than zero"));
    }
    if current_amount < Decimal::ZERO {
        return Err(Error::invalid_input("Current amount cannot be negative"));
    }
    if matches!(monthly_contribution, Some(c) if c < Decimal::ZERO) {
        return Err(Error::invalid_input("Monthly contribution cannot be negative"));
    }
    Ok(())
}

/// Read-only view of how far a goal is from its target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    /// Funded share of the target, capped at 100
    pub percent_complete: Decimal,
    pub remaining_amount: Decimal,
    /// Amount saved beyond the target
    pub overflow_amount: Decimal,
    /// Whole months of contributions still needed; `None` without a contribution
    pub months_to_target: Option<u32>,
    pub projected_completion: Option<NaiveDate>,
    /// Whether the projection meets the deadline; `None` without a deadline
    pub on_track: Option<bool>,
    pub is_completed: bool,
}

impl GoalProgress {
    pub fn for_goal(goal: &Goal, today: NaiveDate) -> Self {
        let remaining = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);
        let overflow = (goal.current_amount - goal.target_amount).max(Decimal::ZERO);
        let percent = if goal.target_amount.is_zero() {
            Decimal::ZERO
        } else {
            (goal.current_amount / goal.target_amount * Decimal::ONE_HUNDRED)
                .min(Decimal::ONE_HUNDRED)
                .round_dp(DISPLAY_DECIMAL_PRECISION)
        };

        let months_to_target = if remaining.is_zero() {
            Some(0)
        } else {
            goal.monthly_contribution
                .filter(|c| *c > Decimal::ZERO)
                .and_then(|c| (remaining / c).ceil().to_u32())
        };
        let projected_completion =
            months_to_target.and_then(|m| today.checked_add_months(Months::new(m)));
        let on_track = goal.deadline.map(|deadline| {
            remaining.is_zero() || projected_completion.is_some_and(|p| p <= deadline)
        });

        Self {
            goal_id: goal.id.clone(),
            percent_complete: percent,
            remaining_amount: remaining,
            overflow_amount: overflow,
            months_to_target,
            projected_completion,
            on_track,
            is_completed: goal.is_completed || remaining.is_zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn goal(current: Decimal, target: Decimal) -> Goal {
        Goal::from(NewGoal {
            name: "Emergency fund".to_string(),
            target_amount: target,
            current_amount: current,
            deadline: None,
            priority: GoalPriority::High,
            category: String::new(),
            monthly_contribution: None,
        })
    }

    #[test]
    fn test_new_goal_defaults() {
        let g = goal(dec!(100), dec!(1000));
        assert_eq!(g.category, "General");
        assert!(!g.is_completed);
    }

    #[test]
    fn test_overfunded_goal_completes_and_reports_overflow() {
        let g = goal(dec!(1200), dec!(1000));
        assert!(g.is_completed);
        assert_eq!(g.current_amount, dec!(1200));

        let progress = g.progress(d(2024, 1, 1));
        assert_eq!(progress.percent_complete, dec!(100));
        assert_eq!(progress.overflow_amount, dec!(200));
        assert_eq!(progress.remaining_amount, Decimal::ZERO);
        assert_eq!(progress.months_to_target, Some(0));
    }

    #[test]
    fn test_months_to_target_rounds_up() {
        let mut g = goal(dec!(250), dec!(1000));
        g.monthly_contribution = Some(dec!(200));
        g.deadline = Some(d(2024, 4, 30));

        let progress = g.progress(d(2024, 1, 15));
        assert_eq!(progress.percent_complete, dec!(25));
        assert_eq!(progress.months_to_target, Some(4));
        assert_eq!(progress.projected_completion, Some(d(2024, 5, 15)));
        assert_eq!(progress.on_track, Some(false));
    }

    #[test]
    fn test_without_contribution_there_is_no_projection() {
        let mut g = goal(dec!(250), dec!(1000));
        g.deadline = Some(d(2030, 1, 1));

        let progress = g.progress(d(2024, 1, 15));
        assert_eq!(progress.months_to_target, None);
        assert_eq!(progress.on_track, Some(false));
    }

    #[test]
    fn test_validation() {
        let mut new = NewGoal {
            name: " ".to_string(),
            target_amount: dec!(1000),
            current_amount: Decimal::ZERO,
            deadline: None,
            priority: GoalPriority::Low,
            category: "Travel".to_string(),
            monthly_contribution: None,
        };
        assert!(new.validate().is_err());
        new.name = "Trip".to_string();
        assert!(new.validate().is_ok());
        new.target_amount = Decimal::ZERO;
        assert!(new.validate().is_err());
        new.target_amount = dec!(10);
        new.current_amount = dec!(-1);
        assert!(new.validate().is_err());
    }
}
