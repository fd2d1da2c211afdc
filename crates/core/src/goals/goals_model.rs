//! Goals domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_GOAL_PERIOD, MAX_PERIOD_DAYS};
use crate::errors::ConfigurationError;
use crate::sales::RecordScope;
use crate::utils::time_utils::elapsed_days_since;

/// Business metric a goal is measured against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum GoalMetric {
    Revenue,
    UnitsSold,
    Profit,
    ProfitMargin,
}

impl GoalMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalMetric::Revenue => "revenue",
            GoalMetric::UnitsSold => "unitsSold",
            GoalMetric::Profit => "profit",
            GoalMetric::ProfitMargin => "profitMargin",
        }
    }

    /// Ratio metrics do not accumulate over time.
    pub fn is_ratio(&self) -> bool {
        matches!(self, GoalMetric::ProfitMargin)
    }
}

impl fmt::Display for GoalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalScope {
    #[default]
    Global,
    Category,
    Sku,
}

impl GoalScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalScope::Global => "global",
            GoalScope::Category => "category",
            GoalScope::Sku => "sku",
        }
    }
}

impl fmt::Display for GoalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a goal's progress against its time window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Met,
    OnTrack,
    OffTrack,
    Unmet,
}

impl GoalStatus {
    /// Classifies progress. First match wins: reaching the target always
    /// means `Met`, even after the window has closed.
    pub fn classify(
        progress_percentage: Decimal,
        time_elapsed_percentage: Decimal,
        is_expired: bool,
    ) -> Self {
        if progress_percentage >= Decimal::ONE_HUNDRED {
            GoalStatus::Met
        } else if is_expired {
            GoalStatus::Unmet
        } else if progress_percentage >= time_elapsed_percentage {
            GoalStatus::OnTrack
        } else {
            GoalStatus::OffTrack
        }
    }

    /// `Met` and `Unmet` are final; the others can still change as time passes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GoalStatus::Met | GoalStatus::Unmet)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Met => "met",
            GoalStatus::OnTrack => "on_track",
            GoalStatus::OffTrack => "off_track",
            GoalStatus::Unmet => "unmet",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A goal's measurement window, parsed from tokens like `"30d"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GoalPeriod(u32);

impl GoalPeriod {
    pub fn days(&self) -> u32 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    pub fn as_duration(&self) -> Duration {
        Duration::days(i64::from(self.0))
    }
}

impl FromStr for GoalPeriod {
    type Err = ConfigurationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidPeriod(token.to_string());

        let digits = token.trim().strip_suffix('d').ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let days: u32 = digits.parse().map_err(|_| invalid())?;
        if days == 0 || days > MAX_PERIOD_DAYS {
            return Err(invalid());
        }
        Ok(GoalPeriod(days))
    }
}

impl fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.0)
    }
}

/// Checks that `target_value` is strictly positive.
pub fn validate_target_value(target_value: Decimal) -> Result<(), ConfigurationError> {
    if target_value <= Decimal::ZERO {
        return Err(ConfigurationError::NonPositiveTarget(
            target_value.to_string(),
        ));
    }
    Ok(())
}

/// Resolves a scope and its optional targets into the record filter it
/// implies. Exactly the target matching `scope` must be set.
pub fn resolve_record_scope(
    scope: GoalScope,
    target_category: Option<&str>,
    target_sku: Option<&str>,
) -> Result<RecordScope, ConfigurationError> {
    let mismatch = |detail: &str| ConfigurationError::ScopeTargetMismatch {
        scope: scope.to_string(),
        detail: detail.to_string(),
    };
    fn present(value: Option<&str>) -> Option<&str> {
        value.filter(|v| !v.trim().is_empty())
    }

    match (scope, present(target_category), present(target_sku)) {
        (GoalScope::Global, None, None) => Ok(RecordScope::All),
        (GoalScope::Global, _, _) => Err(mismatch("global goals take no category or SKU")),
        (GoalScope::Category, Some(category), None) => {
            Ok(RecordScope::Category(category.to_string()))
        }
        (GoalScope::Category, None, _) => Err(mismatch("targetCategory is required")),
        (GoalScope::Category, Some(_), Some(_)) => {
            Err(mismatch("category goals cannot also set targetSku"))
        }
        (GoalScope::Sku, None, Some(sku)) => Ok(RecordScope::Sku(sku.to_string())),
        (GoalScope::Sku, _, None) => Err(mismatch("targetSku is required")),
        (GoalScope::Sku, Some(_), Some(_)) => {
            Err(mismatch("SKU goals cannot also set targetCategory"))
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalDefinition {
    pub id: String,
    pub user_id: String,
    pub metric: GoalMetric,
    pub target_value: Decimal,
    pub scope: GoalScope,
    pub target_category: Option<String>,
    pub target_sku: Option<String>,
    pub period: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub description: Option<String>,
}

impl GoalDefinition {
    pub fn parsed_period(&self) -> Result<GoalPeriod, ConfigurationError> {
        self.period.parse()
    }

    pub fn record_scope(&self) -> Result<RecordScope, ConfigurationError> {
        resolve_record_scope(
            self.scope,
            self.target_category.as_deref(),
            self.target_sku.as_deref(),
        )
    }

    /// End of the measurement window.
    pub fn ends_at(&self) -> Result<DateTime<Utc>, ConfigurationError> {
        Ok(self.created_at + self.parsed_period()?.as_duration())
    }

    /// Full structural check, as applied when the goal is created.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_target_value(self.target_value)?;
        self.parsed_period()?;
        self.record_scope()?;
        Ok(())
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub id: Option<String>,
    pub user_id: String,
    pub metric: GoalMetric,
    pub target_value: Decimal,
    #[serde(default)]
    pub scope: GoalScope,
    pub target_category: Option<String>,
    pub target_sku: Option<String>,
    pub period: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl NewGoal {
    /// Trims free-text fields and drops empty optionals.
    pub fn normalized(self) -> Self {
        Self {
            id: trimmed(self.id),
            user_id: self.user_id.trim().to_string(),
            target_category: trimmed(self.target_category),
            target_sku: trimmed(self.target_sku),
            period: trimmed(self.period),
            description: trimmed(self.description),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.user_id.trim().is_empty() {
            return Err(ConfigurationError::MissingField("userId".to_string()));
        }
        validate_target_value(self.target_value)?;
        self.period
            .as_deref()
            .unwrap_or(DEFAULT_GOAL_PERIOD)
            .parse::<GoalPeriod>()?;
        resolve_record_scope(
            self.scope,
            self.target_category.as_deref(),
            self.target_sku.as_deref(),
        )?;
        Ok(())
    }

    /// Validates and builds the stored definition.
    pub fn into_definition(self, now: DateTime<Utc>) -> Result<GoalDefinition, ConfigurationError> {
        self.validate()?;
        let period = self
            .period
            .as_deref()
            .unwrap_or(DEFAULT_GOAL_PERIOD)
            .parse::<GoalPeriod>()?
            .to_string();

        Ok(GoalDefinition {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            user_id: self.user_id,
            metric: self.metric,
            target_value: self.target_value,
            scope: self.scope,
            target_category: self.target_category,
            target_sku: self.target_sku,
            period,
            created_at: self.created_at.unwrap_or(now),
            is_active: true,
            description: self.description,
        })
    }
}

/// Input model for editing an existing goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub id: String,
    pub metric: GoalMetric,
    pub target_value: Decimal,
    pub scope: GoalScope,
    pub target_category: Option<String>,
    pub target_sku: Option<String>,
    pub period: String,
    pub description: Option<String>,
}

impl GoalUpdate {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_target_value(self.target_value)?;
        self.period.parse::<GoalPeriod>()?;
        resolve_record_scope(
            self.scope,
            self.target_category.as_deref(),
            self.target_sku.as_deref(),
        )?;
        Ok(())
    }

    /// Validates and applies the editable fields onto `goal`, keeping owner,
    /// start and archive state.
    pub fn apply_to(self, goal: GoalDefinition) -> Result<GoalDefinition, ConfigurationError> {
        self.validate()?;
        let period = self.period.parse::<GoalPeriod>()?.to_string();

        Ok(GoalDefinition {
            metric: self.metric,
            target_value: self.target_value,
            scope: self.scope,
            target_category: trimmed(self.target_category),
            target_sku: trimmed(self.target_sku),
            period,
            description: trimmed(self.description),
            ..goal
        })
    }
}

/// Derived view of a goal at one instant. Recomputed on every evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub metric: GoalMetric,
    pub target_value: Decimal,
    pub current_value: Decimal,
    pub progress_percentage: Decimal,
    pub time_elapsed_percentage: Decimal,
    pub days_remaining: i64,
    pub is_expired: bool,
    pub status: GoalStatus,
    /// Linear forecast of the value at the end of the window
    pub projected_value: Option<Decimal>,
    /// Amount per remaining day needed to hit the target
    pub required_daily_rate: Option<Decimal>,
    pub evaluated_at: DateTime<Utc>,
}

/// Immutable record of a goal that reached a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalHistory {
    pub id: String,
    pub goal_id: String,
    pub goal: GoalDefinition,
    pub final_value: Decimal,
    pub final_status: GoalStatus,
    pub days_to_complete: i64,
    pub completed_at: DateTime<Utc>,
}

impl GoalHistory {
    /// Snapshots `goal` with the outcome in `progress`.
    pub fn snapshot(
        goal: &GoalDefinition,
        progress: &GoalProgress,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ConfigurationError> {
        let period_days = goal.parsed_period()?.as_decimal();
        let elapsed = elapsed_days_since(goal.created_at, completed_at);
        let days_to_complete = elapsed.min(period_days).ceil().to_i64().unwrap_or(0);

        Ok(GoalHistory {
            id: Uuid::new_v4().to_string(),
            goal_id: goal.id.clone(),
            goal: goal.clone(),
            final_value: progress.current_value,
            final_status: progress.status,
            days_to_complete,
            completed_at,
        })
    }
}

/// What happens to a goal once its history snapshot is written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CompletionAction {
    #[default]
    Archive,
    Delete,
}

/// Outcome of evaluating one goal in a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GoalEvaluation {
    Available(GoalProgress),
    #[serde(rename_all = "camelCase")]
    Unavailable { goal_id: String, reason: String },
}

impl GoalEvaluation {
    pub fn goal_id(&self) -> &str {
        match self {
            GoalEvaluation::Available(progress) => &progress.goal_id,
            GoalEvaluation::Unavailable { goal_id, .. } => goal_id,
        }
    }

    pub fn progress(&self) -> Option<&GoalProgress> {
        match self {
            GoalEvaluation::Available(progress) => Some(progress),
            GoalEvaluation::Unavailable { .. } => None,
        }
    }
}
