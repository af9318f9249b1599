use crate::errors::{Error, Result};
use crate::goals::goals_model::{Goal, GoalProgress, NewGoal};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct GoalService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    pub fn new(goal_repo: Arc<dyn GoalRepositoryTrait>) -> Self {
        GoalService { goal_repo }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self) -> Result<Vec<Goal>> {
        self.goal_repo.load_goals()
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.goal_repo.get_goal(goal_id)
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        if let Err(e) = new_goal.validate() {
            warn!("Rejected new goal '{}': {}", new_goal.name, e);
            return Err(e);
        }
        self.goal_repo.insert_new_goal(new_goal).await
    }

    async fn update_goal(&self, updated_goal_data: Goal) -> Result<Goal> {
        if let Err(e) = updated_goal_data.validate() {
            warn!("Rejected update of goal {}: {}", updated_goal_data.id, e);
            return Err(e);
        }
        let mut goal = updated_goal_data;
        goal.refresh_completion();
        goal.updated_at = Utc::now().naive_utc();
        self.goal_repo.update_goal(goal).await
    }

    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
        self.goal_repo.delete_goal(goal_id_to_delete).await
    }

    async fn contribute(&self, goal_id: &str, amount: Decimal) -> Result<Goal> {
        if amount <= Decimal::ZERO {
            return Err(Error::invalid_input(
                "Contribution must be greater than zero",
            ));
        }
        let mut goal = self.goal_repo.get_goal(goal_id)?;
        let was_completed = goal.is_completed;
        goal.current_amount += amount;
        goal.refresh_completion();
        goal.updated_at = Utc::now().naive_utc();
        if goal.is_completed && !was_completed {
            info!(
                "Goal '{}' reached its target of {}",
                goal.name, goal.target_amount
            );
        }
        self.goal_repo.update_goal(goal).await
    }

    fn get_goal_progress(&self, goal_id: &str, today: NaiveDate) -> Result<GoalProgress> {
        Ok(self.goal_repo.get_goal(goal_id)?.progress(today))
    }
}
