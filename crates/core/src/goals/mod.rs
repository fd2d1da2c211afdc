//! Goals module - domain models, progress evaluation, services, and traits.

mod goals_evaluator;
mod goals_model;
mod goals_service;
mod goals_traits;

pub use goals_evaluator::evaluate;
pub use goals_model::{
    resolve_record_scope, validate_target_value, CompletionAction, GoalDefinition,
    GoalEvaluation, GoalHistory, GoalMetric, GoalPeriod, GoalProgress, GoalScope, GoalStatus,
    GoalUpdate, NewGoal,
};
pub use goals_service::GoalService;
pub use goals_traits::{GoalHistoryRepositoryTrait, GoalRepositoryTrait, GoalServiceTrait};

#[cfg(test)]
mod goals_model_tests;
