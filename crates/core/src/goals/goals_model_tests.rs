//! Tests for goal domain models: period parsing, scope validation, status
//! classification and serialization.

use super::*;
use crate::errors::ConfigurationError;
use crate::sales::RecordScope;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn create_new_goal() -> NewGoal {
    NewGoal {
        id: None,
        user_id: "user-1".to_string(),
        metric: GoalMetric::Revenue,
        target_value: dec!(1000),
        scope: GoalScope::Global,
        target_category: None,
        target_sku: None,
        period: Some("30d".to_string()),
        created_at: None,
        description: None,
    }
}

// ==================== GoalPeriod ====================

#[test]
fn test_standard_periods_parse() {
    for (token, days) in [("7d", 7), ("30d", 30), ("90d", 90), ("180d", 180), ("365d", 365)] {
        let period: GoalPeriod = token.parse().unwrap();
        assert_eq!(period.days(), days);
        assert_eq!(period.to_string(), token);
    }
}

#[test]
fn test_period_allows_surrounding_whitespace() {
    let period: GoalPeriod = " 14d ".parse().unwrap();
    assert_eq!(period.days(), 14);
    assert_eq!(period.as_duration(), Duration::days(14));
}

#[test]
fn test_malformed_periods_are_rejected() {
    for token in ["abc", "", "d", "30", "0d", "-7d", "1.5d", "+7d", "7 d", "30D", "9999d"] {
        let err = token.parse::<GoalPeriod>().unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidPeriod(token.to_string()));
    }
}

// ==================== Scope / target ====================

#[test]
fn test_resolve_record_scope_valid_pairings() {
    assert_eq!(
        resolve_record_scope(GoalScope::Global, None, None).unwrap(),
        RecordScope::All
    );
    assert_eq!(
        resolve_record_scope(GoalScope::Category, Some("electronics"), None).unwrap(),
        RecordScope::Category("electronics".to_string())
    );
    assert_eq!(
        resolve_record_scope(GoalScope::Sku, None, Some("B00X")).unwrap(),
        RecordScope::Sku("B00X".to_string())
    );
}

#[test]
fn test_blank_target_counts_as_missing() {
    assert!(resolve_record_scope(GoalScope::Category, Some("  "), None).is_err());
    assert!(resolve_record_scope(GoalScope::Global, Some(""), None).is_ok());
}

#[test]
fn test_resolve_record_scope_rejects_mismatches() {
    let cases = [
        (GoalScope::Global, Some("electronics"), None),
        (GoalScope::Global, None, Some("B00X")),
        (GoalScope::Category, None, None),
        (GoalScope::Category, None, Some("B00X")),
        (GoalScope::Category, Some("electronics"), Some("B00X")),
        (GoalScope::Sku, None, None),
        (GoalScope::Sku, Some("electronics"), None),
        (GoalScope::Sku, Some("electronics"), Some("B00X")),
    ];
    for (scope, category, sku) in cases {
        let err = resolve_record_scope(scope, category, sku).unwrap_err();
        assert!(
            matches!(err, ConfigurationError::ScopeTargetMismatch { .. }),
            "expected mismatch for {:?} {:?} {:?}",
            scope,
            category,
            sku
        );
    }
}

// ==================== Target value ====================

#[test]
fn test_target_value_must_be_positive() {
    assert!(validate_target_value(dec!(0.01)).is_ok());
    assert_eq!(
        validate_target_value(Decimal::ZERO).unwrap_err(),
        ConfigurationError::NonPositiveTarget("0".to_string())
    );
    assert!(validate_target_value(dec!(-5)).is_err());
}

// ==================== GoalStatus ====================

#[test]
fn test_classify_precedence() {
    assert_eq!(GoalStatus::classify(dec!(100), dec!(100), true), GoalStatus::Met);
    assert_eq!(GoalStatus::classify(dec!(100), dec!(10), false), GoalStatus::Met);
    assert_eq!(GoalStatus::classify(dec!(99.9), dec!(100), true), GoalStatus::Unmet);
    assert_eq!(GoalStatus::classify(dec!(99.9), dec!(10), true), GoalStatus::Unmet);
    assert_eq!(GoalStatus::classify(dec!(50), dec!(50), false), GoalStatus::OnTrack);
    assert_eq!(GoalStatus::classify(dec!(49), dec!(50), false), GoalStatus::OffTrack);
}

#[test]
fn test_terminal_statuses() {
    assert!(GoalStatus::Met.is_terminal());
    assert!(GoalStatus::Unmet.is_terminal());
    assert!(!GoalStatus::OnTrack.is_terminal());
    assert!(!GoalStatus::OffTrack.is_terminal());
}

#[test]
fn test_status_serialization() {
    assert_eq!(serde_json::to_string(&GoalStatus::Met).unwrap(), "\"met\"");
    assert_eq!(serde_json::to_string(&GoalStatus::OnTrack).unwrap(), "\"on_track\"");
    assert_eq!(serde_json::to_string(&GoalStatus::OffTrack).unwrap(), "\"off_track\"");
    assert_eq!(serde_json::to_string(&GoalStatus::Unmet).unwrap(), "\"unmet\"");
}

#[test]
fn test_metric_and_scope_serialization() {
    assert_eq!(serde_json::to_string(&GoalMetric::UnitsSold).unwrap(), "\"unitsSold\"");
    assert_eq!(
        serde_json::from_str::<GoalMetric>("\"profitMargin\"").unwrap(),
        GoalMetric::ProfitMargin
    );
    assert_eq!(serde_json::to_string(&GoalScope::Sku).unwrap(), "\"sku\"");
    assert_eq!(
        serde_json::from_str::<GoalScope>("\"category\"").unwrap(),
        GoalScope::Category
    );
}

// ==================== NewGoal ====================

#[test]
fn test_new_goal_deserializes_from_camel_case() {
    let json = r#"{
        "userId": "user-9",
        "metric": "unitsSold",
        "targetValue": 50,
        "scope": "sku",
        "targetSku": "B00X",
        "period": "7d"
    }"#;

    let new_goal: NewGoal = serde_json::from_str(json).unwrap();

    assert_eq!(new_goal.user_id, "user-9");
    assert_eq!(new_goal.metric, GoalMetric::UnitsSold);
    assert_eq!(new_goal.target_value, dec!(50));
    assert_eq!(new_goal.target_sku.as_deref(), Some("B00X"));
    assert!(new_goal.validate().is_ok());
}

#[test]
fn test_new_goal_scope_defaults_to_global() {
    let json = r#"{"userId": "u", "metric": "revenue", "targetValue": 10}"#;
    let new_goal: NewGoal = serde_json::from_str(json).unwrap();
    assert_eq!(new_goal.scope, GoalScope::Global);
    assert!(new_goal.validate().is_ok());
}

#[test]
fn test_new_goal_requires_user() {
    let mut new_goal = create_new_goal();
    new_goal.user_id = "  ".to_string();
    assert_eq!(
        new_goal.validate().unwrap_err(),
        ConfigurationError::MissingField("userId".to_string())
    );
}

#[test]
fn test_new_goal_rejects_bad_period() {
    let mut new_goal = create_new_goal();
    new_goal.period = Some("monthly".to_string());
    assert!(matches!(
        new_goal.validate().unwrap_err(),
        ConfigurationError::InvalidPeriod(_)
    ));
}

#[test]
fn test_normalized_trims_fields() {
    let mut new_goal = create_new_goal();
    new_goal.id = Some("   ".to_string());
    new_goal.scope = GoalScope::Category;
    new_goal.target_category = Some("  electronics ".to_string());
    new_goal.target_sku = Some("".to_string());
    new_goal.period = Some(" 90d ".to_string());
    new_goal.description = Some("  Q1 push ".to_string());

    let normalized = new_goal.normalized();

    assert_eq!(normalized.id, None);
    assert_eq!(normalized.target_category.as_deref(), Some("electronics"));
    assert_eq!(normalized.target_sku, None);
    assert_eq!(normalized.period.as_deref(), Some("90d"));
    assert_eq!(normalized.description.as_deref(), Some("Q1 push"));
    assert!(normalized.validate().is_ok());
}

#[test]
fn test_into_definition_fills_defaults() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut new_goal = create_new_goal();
    new_goal.period = None;

    let goal = new_goal.into_definition(now).unwrap();

    assert!(!goal.id.is_empty());
    assert_eq!(goal.period, "30d");
    assert_eq!(goal.created_at, now);
    assert!(goal.is_active);
    assert!(goal.validate().is_ok());
}

#[test]
fn test_into_definition_keeps_explicit_id_and_start() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let mut new_goal = create_new_goal();
    new_goal.id = Some("goal-42".to_string());
    new_goal.created_at = Some(start);
    new_goal.period = Some("007d".to_string());

    let goal = new_goal.into_definition(now).unwrap();

    assert_eq!(goal.id, "goal-42");
    assert_eq!(goal.created_at, start);
    assert_eq!(goal.period, "7d");
    assert_eq!(goal.ends_at().unwrap(), start + Duration::days(7));
}

#[test]
fn test_into_definition_rejects_malformed_period() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut new_goal = create_new_goal();
    new_goal.period = Some("abc".to_string());

    let err = new_goal.into_definition(now).unwrap_err();

    assert_eq!(err, ConfigurationError::InvalidPeriod("abc".to_string()));
}

#[test]
fn test_into_definition_rejects_invalid_scope() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut new_goal = create_new_goal();
    new_goal.scope = GoalScope::Sku;

    assert!(matches!(
        new_goal.into_definition(now).unwrap_err(),
        ConfigurationError::ScopeTargetMismatch { .. }
    ));
}

// ==================== GoalUpdate ====================

#[test]
fn test_update_preserves_owner_start_and_state() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut goal = create_new_goal().into_definition(now).unwrap();
    goal.is_active = false;

    let update = GoalUpdate {
        id: goal.id.clone(),
        metric: GoalMetric::Profit,
        target_value: dec!(250),
        scope: GoalScope::Sku,
        target_category: None,
        target_sku: Some(" B00X ".to_string()),
        period: "90d".to_string(),
        description: Some("".to_string()),
    };
    assert!(update.validate().is_ok());

    let updated = update.apply_to(goal.clone()).unwrap();

    assert_eq!(updated.id, goal.id);
    assert_eq!(updated.user_id, goal.user_id);
    assert_eq!(updated.created_at, goal.created_at);
    assert!(!updated.is_active);
    assert_eq!(updated.metric, GoalMetric::Profit);
    assert_eq!(updated.target_sku.as_deref(), Some("B00X"));
    assert_eq!(updated.description, None);
    assert_eq!(updated.period, "90d");
}

#[test]
fn test_update_with_malformed_period_is_rejected() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let goal = create_new_goal().into_definition(now).unwrap();
    let update = GoalUpdate {
        id: goal.id.clone(),
        metric: GoalMetric::Revenue,
        target_value: dec!(100),
        scope: GoalScope::Global,
        target_category: None,
        target_sku: None,
        period: "quarterly".to_string(),
        description: None,
    };

    let err = update.apply_to(goal).unwrap_err();

    assert_eq!(
        err,
        ConfigurationError::InvalidPeriod("quarterly".to_string())
    );
}

// ==================== GoalEvaluation ====================

#[test]
fn test_unavailable_evaluation_serialization() {
    let evaluation = GoalEvaluation::Unavailable {
        goal_id: "goal-1".to_string(),
        reason: "bad period".to_string(),
    };

    let value = serde_json::to_value(&evaluation).unwrap();

    assert_eq!(value["state"], "unavailable");
    assert_eq!(value["goalId"], "goal-1");
    assert_eq!(evaluation.goal_id(), "goal-1");
    assert!(evaluation.progress().is_none());
}
