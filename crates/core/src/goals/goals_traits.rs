use crate::errors::Result;
use crate::goals::goals_model::{
    CompletionAction, GoalDefinition, GoalEvaluation, GoalHistory, GoalProgress, GoalUpdate,
    NewGoal,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn load_goals(&self) -> Result<Vec<GoalDefinition>>;
    /// Fails with `Error::NotFound` when no goal has this id.
    fn get_goal(&self, goal_id: &str) -> Result<GoalDefinition>;
    async fn insert_new_goal(&self, goal: GoalDefinition) -> Result<GoalDefinition>;
    async fn update_goal(&self, goal: GoalDefinition) -> Result<GoalDefinition>;
    async fn delete_goal(&self, goal_id: &str) -> Result<usize>;
}

/// Trait for the append-only goal history store
#[async_trait]
pub trait GoalHistoryRepositoryTrait: Send + Sync {
    fn load_history(&self) -> Result<Vec<GoalHistory>>;
    fn get_history_for_goal(&self, goal_id: &str) -> Result<Option<GoalHistory>>;
    async fn insert_history(&self, history: GoalHistory) -> Result<GoalHistory>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self) -> Result<Vec<GoalDefinition>>;
    fn get_active_goals(&self) -> Result<Vec<GoalDefinition>>;
    fn get_goal(&self, goal_id: &str) -> Result<GoalDefinition>;
    async fn create_goal(&self, new_goal: NewGoal, now: DateTime<Utc>) -> Result<GoalDefinition>;
    async fn update_goal(&self, update: GoalUpdate) -> Result<GoalDefinition>;
    async fn archive_goal(&self, goal_id: &str) -> Result<GoalDefinition>;
    async fn delete_goal(&self, goal_id: &str) -> Result<usize>;
    fn evaluate_goal(&self, goal_id: &str, now: DateTime<Utc>) -> Result<GoalProgress>;
    fn evaluate_active_goals(&self, now: DateTime<Utc>) -> Result<Vec<GoalEvaluation>>;
    async fn finalize_goal(
        &self,
        goal_id: &str,
        now: DateTime<Utc>,
        action: CompletionAction,
    ) -> Result<Option<GoalHistory>>;
    fn get_goal_history(&self) -> Result<Vec<GoalHistory>>;
}
