#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::goals::{
        Goal, GoalPriority, GoalRepositoryTrait, GoalService, GoalServiceTrait, NewGoal,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockGoalRepository {
        goals: Arc<Mutex<Vec<Goal>>>,
    }

    #[async_trait]
    impl GoalRepositoryTrait for MockGoalRepository {
        fn load_goals(&self) -> Result<Vec<Goal>> {
            Ok(self.goals.lock().unwrap().clone())
        }

        fn get_goal(&self, goal_id: &str) -> Result<Goal> {
            self.goals
                .lock()
                .unwrap()
                .iter()
                .find(|g| g.id == goal_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("goal {}", goal_id)))
        }

        async fn insert_new_goal(&self, new_goal: NewGoal) -> Result<Goal> {
            let goal = Goal::from(new_goal);
            self.goals.lock().unwrap().push(goal.clone());
            Ok(goal)
        }

        async fn update_goal(&self, goal_update: Goal) -> Result<Goal> {
            let mut goals = self.goals.lock().unwrap();
            let slot = goals
                .iter_mut()
                .find(|g| g.id == goal_update.id)
                .ok_or_else(|| Error::NotFound(format!("goal {}", goal_update.id)))?;
            *slot = goal_update.clone();
            Ok(goal_update)
        }

        async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
            let mut goals = self.goals.lock().unwrap();
            let before = goals.len();
            goals.retain(|g| g.id != goal_id_to_delete);
            Ok(before - goals.len())
        }
    }

    fn setup() -> (GoalService, MockGoalRepository) {
        let repo = MockGoalRepository::default();
        (GoalService::new(Arc::new(repo.clone())), repo)
    }

    fn new_goal(target: Decimal) -> NewGoal {
        NewGoal {
            name: "House deposit".to_string(),
            target_amount: target,
            current_amount: dec!(1000),
            deadline: NaiveDate::from_ymd_opt(2026, 12, 31),
            priority: GoalPriority::High,
            category: "Home".to_string(),
            monthly_contribution: Some(dec!(500)),
        }
    }

    #[tokio::test]
    async fn test_create_goal_validates() {
        let (service, repo) = setup();
        assert!(service.create_goal(new_goal(Decimal::ZERO)).await.is_err());
        assert!(repo.load_goals().unwrap().is_empty());

        let goal = service.create_goal(new_goal(dec!(5000))).await.unwrap();
        assert_eq!(service.get_goals().unwrap(), vec![goal]);
    }

    #[tokio::test]
    async fn test_contribution_past_target_completes_goal() {
        let (service, _) = setup();
        let goal = service.create_goal(new_goal(dec!(2000))).await.unwrap();

        let goal = service.contribute(&goal.id, dec!(600)).await.unwrap();
        assert!(!goal.is_completed);
        let goal = service.contribute(&goal.id, dec!(600)).await.unwrap();
        assert!(goal.is_completed);
        assert_eq!(goal.current_amount, dec!(2200));

        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let progress = service.get_goal_progress(&goal.id, today).unwrap();
        assert_eq!(progress.overflow_amount, dec!(200));
        assert_eq!(progress.on_track, Some(true));
    }

    #[tokio::test]
    async fn test_contribution_must_be_positive() {
        let (service, _) = setup();
        let goal = service.create_goal(new_goal(dec!(2000))).await.unwrap();
        assert!(service.contribute(&goal.id, Decimal::ZERO).await.is_err());
        assert!(matches!(
            service.contribute("missing", dec!(10)).await,
            Err(Error::NotFound(_))
        ));
        assert_eq!(service.get_goal(&goal.id).unwrap().current_amount, dec!(1000));
    }

    #[tokio::test]
    async fn test_update_goal_rejects_negative_amount() {
        let (service, _) = setup();
        let goal = service.create_goal(new_goal(dec!(2000))).await.unwrap();

        let mut invalid = goal.clone();
        invalid.current_amount = dec!(-5);
        assert!(service.update_goal(invalid).await.is_err());

        let mut renamed = goal.clone();
        renamed.name = "Bigger house".to_string();
        renamed.target_amount = dec!(900);
        let updated = service.update_goal(renamed).await.unwrap();
        assert_eq!(updated.name, "Bigger house");
        assert!(updated.is_completed);
    }

    #[tokio::test]
    async fn test_delete_goal() {
        let (service, repo) = setup();
        let goal = service.create_goal(new_goal(dec!(2000))).await.unwrap();
        assert_eq!(service.delete_goal(goal.id).await.unwrap(), 1);
        assert!(repo.load_goals().unwrap().is_empty());
    }
}
