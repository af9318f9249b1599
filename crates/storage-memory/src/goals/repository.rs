use std::sync::Arc;

use async_trait::async_trait;
use finboard_core::goals::{Goal, GoalRepositoryTrait, NewGoal};
use finboard_core::Result;

use crate::db::MemoryStore;
use crate::errors::{IntoCore, StorageError};

const ENTITY: &str = "Goal";

pub struct GoalRepository {
    store: Arc<MemoryStore>,
}

impl GoalRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        GoalRepository { store }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn load_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.store.read(|state| state.goals.clone()))
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.store
            .read(|state| {
                state
                    .goals
                    .iter()
                    .find(|g| g.id == goal_id)
                    .cloned()
                    .ok_or_else(|| StorageError::not_found(ENTITY, goal_id))
            })
            .into_core()
    }

    async fn insert_new_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        let goal = Goal::from(new_goal);
        self.store
            .write(move |state| {
                state.goals.push(goal.clone());
                Ok(goal)
            })
            .into_core()
    }

    async fn update_goal(&self, goal_update: Goal) -> Result<Goal> {
        self.store
            .write(move |state| {
                let slot = state
                    .goals
                    .iter_mut()
                    .find(|g| g.id == goal_update.id)
                    .ok_or_else(|| StorageError::not_found(ENTITY, goal_update.id.as_str()))?;
                *slot = goal_update.clone();
                Ok(goal_update)
            })
            .into_core()
    }

    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
        self.store
            .write(|state| {
                let before = state.goals.len();
                state.goals.retain(|g| g.id != goal_id_to_delete);
                Ok(before - state.goals.len())
            })
            .into_core()
    }
}
