use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::goals_evaluator::evaluate;
use super::goals_model::{
    CompletionAction, GoalDefinition, GoalEvaluation, GoalHistory, GoalProgress, GoalUpdate,
    NewGoal,
};
use super::goals_traits::{GoalHistoryRepositoryTrait, GoalRepositoryTrait, GoalServiceTrait};
use crate::errors::{Error, Result};
use crate::sales::SalesRepositoryTrait;

/// Service for managing goals and evaluating their progress
pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    history_repository: Arc<dyn GoalHistoryRepositoryTrait>,
    sales_repository: Arc<dyn SalesRepositoryTrait>,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        history_repository: Arc<dyn GoalHistoryRepositoryTrait>,
        sales_repository: Arc<dyn SalesRepositoryTrait>,
    ) -> Self {
        GoalService {
            goal_repository,
            history_repository,
            sales_repository,
        }
    }

    /// Fetches the goal's records and evaluates it. Configuration problems
    /// are detected before any records are fetched.
    fn evaluate_definition(
        &self,
        goal: &GoalDefinition,
        now: DateTime<Utc>,
    ) -> Result<GoalProgress> {
        goal.parsed_period()?;
        let scope = goal.record_scope()?;

        let records = self.sales_repository.fetch_records_for_goal(
            &goal.user_id,
            &scope,
            goal.created_at,
            now,
        )?;
        debug!(
            "Fetched {} sale records for goal {} ({:?})",
            records.len(),
            goal.id,
            scope
        );

        Ok(evaluate(goal, &records, now)?)
    }

    /// Archives or deletes a finalized goal. Safe to repeat: an already
    /// archived or deleted goal is left as is.
    async fn apply_completion_action(&self, goal_id: &str, action: CompletionAction) -> Result<()> {
        match action {
            CompletionAction::Archive => match self.goal_repository.get_goal(goal_id) {
                Ok(goal) if goal.is_active => {
                    self.archive_goal(goal_id).await?;
                }
                Ok(_) | Err(Error::NotFound(_)) => {}
                Err(e) => return Err(e),
            },
            CompletionAction::Delete => {
                self.goal_repository.delete_goal(goal_id).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self) -> Result<Vec<GoalDefinition>> {
        self.goal_repository.load_goals()
    }

    fn get_active_goals(&self) -> Result<Vec<GoalDefinition>> {
        Ok(self
            .goal_repository
            .load_goals()?
            .into_iter()
            .filter(|g| g.is_active)
            .collect())
    }

    fn get_goal(&self, goal_id: &str) -> Result<GoalDefinition> {
        self.goal_repository.get_goal(goal_id)
    }

    async fn create_goal(&self, new_goal: NewGoal, now: DateTime<Utc>) -> Result<GoalDefinition> {
        let goal = new_goal.normalized().into_definition(now)?;
        debug!(
            "Creating goal {} for user {}: {} {} over {}",
            goal.id, goal.user_id, goal.metric, goal.target_value, goal.period
        );
        self.goal_repository.insert_new_goal(goal).await
    }

    async fn update_goal(&self, update: GoalUpdate) -> Result<GoalDefinition> {
        update.validate()?;

        let existing = self.goal_repository.get_goal(&update.id)?;
        let updated = update.apply_to(existing)?;
        debug!("Updating goal {}", updated.id);
        self.goal_repository.update_goal(updated).await
    }

    async fn archive_goal(&self, goal_id: &str) -> Result<GoalDefinition> {
        let goal = self.goal_repository.get_goal(goal_id)?;
        if !goal.is_active {
            return Ok(goal);
        }
        debug!("Archiving goal {}", goal_id);
        self.goal_repository
            .update_goal(GoalDefinition {
                is_active: false,
                ..goal
            })
            .await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<usize> {
        debug!("Deleting goal {}", goal_id);
        self.goal_repository.delete_goal(goal_id).await
    }

    fn evaluate_goal(&self, goal_id: &str, now: DateTime<Utc>) -> Result<GoalProgress> {
        let goal = self.goal_repository.get_goal(goal_id)?;
        self.evaluate_definition(&goal, now)
    }

    fn evaluate_active_goals(&self, now: DateTime<Utc>) -> Result<Vec<GoalEvaluation>> {
        let goals = self.get_active_goals()?;
        let mut evaluations = Vec::with_capacity(goals.len());

        for goal in &goals {
            match self.evaluate_definition(goal, now) {
                Ok(progress) => evaluations.push(GoalEvaluation::Available(progress)),
                Err(Error::Configuration(err)) => {
                    warn!("Goal {} cannot be evaluated: {}", goal.id, err);
                    evaluations.push(GoalEvaluation::Unavailable {
                        goal_id: goal.id.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(evaluations)
    }

    async fn finalize_goal(
        &self,
        goal_id: &str,
        now: DateTime<Utc>,
        action: CompletionAction,
    ) -> Result<Option<GoalHistory>> {
        if let Some(existing) = self.history_repository.get_history_for_goal(goal_id)? {
            debug!("Goal {} already has a history record", goal_id);
            // A previous call may have failed between writing history and
            // applying the action.
            self.apply_completion_action(goal_id, action).await?;
            return Ok(Some(existing));
        }

        let goal = self.goal_repository.get_goal(goal_id)?;
        let progress = self.evaluate_definition(&goal, now)?;
        if !progress.status.is_terminal() {
            debug!(
                "Goal {} is {} and cannot be finalized yet",
                goal_id, progress.status
            );
            return Ok(None);
        }

        let history = GoalHistory::snapshot(&goal, &progress, now)?;
        let history = self.history_repository.insert_history(history).await?;
        info!(
            "Recorded goal {} as {} with final value {} after {} days",
            goal_id, history.final_status, history.final_value, history.days_to_complete
        );

        self.apply_completion_action(goal_id, action).await?;

        Ok(Some(history))
    }

    fn get_goal_history(&self) -> Result<Vec<GoalHistory>> {
        self.history_repository.load_history()
    }
}
