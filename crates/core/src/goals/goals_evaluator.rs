//! Goal progress evaluation.
//!
//! Turns a goal definition plus a snapshot of sale records into a
//! [`GoalProgress`]. Everything here is pure: the current time is passed in
//! and nothing is read from or written to storage.

use chrono::{DateTime, Utc};
use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use super::goals_model::{GoalDefinition, GoalMetric, GoalProgress, GoalStatus};
use crate::constants::DECIMAL_PRECISION;
use crate::errors::ConfigurationError;
use crate::sales::SaleRecord;
use crate::utils::time_utils::elapsed_days_since;

/// Evaluates `goal` against `records` as of `now`.
///
/// `records` must already belong to the goal's owner. Records outside
/// `[goal.created_at, now]` or outside the goal's scope are ignored.
///
/// # Errors
/// Returns a [`ConfigurationError`] when the period token cannot be parsed or
/// the scope and its target disagree. A non-positive target is not an error
/// here; it yields zero progress.
pub fn evaluate(
    goal: &GoalDefinition,
    records: &[SaleRecord],
    now: DateTime<Utc>,
) -> Result<GoalProgress, ConfigurationError> {
    let period = goal.parsed_period()?;
    let scope = goal.record_scope()?;

    let matching = records
        .iter()
        .filter(|r| r.date >= goal.created_at && r.date <= now)
        .filter(|r| scope.matches(r));
    let current_value = aggregate(goal.metric, matching);

    let period_days = period.as_decimal();
    let elapsed_days = elapsed_days_since(goal.created_at, now);

    let progress_percentage = percentage_of(current_value, goal.target_value);
    let time_elapsed_percentage = percentage_of(elapsed_days, period_days);
    let days_remaining = (period_days - elapsed_days)
        .ceil()
        .max(Decimal::ZERO)
        .to_i64()
        .unwrap_or(0);
    let is_expired = elapsed_days > period_days;

    let status = GoalStatus::classify(progress_percentage, time_elapsed_percentage, is_expired);

    let projected_value = project_value(goal.metric, current_value, elapsed_days, period_days);
    let required_daily_rate = if goal.metric.is_ratio() || status.is_terminal() || days_remaining == 0
    {
        None
    } else {
        let shortfall = goal
            .target_value
            .saturating_sub(current_value)
            .max(Decimal::ZERO);
        Some((shortfall / Decimal::from(days_remaining)).round_dp(DECIMAL_PRECISION))
    };

    debug!(
        "Evaluated goal {} ({}): {} of {} ({}%), {}% of period elapsed, status {}",
        goal.id,
        goal.metric,
        current_value,
        goal.target_value,
        progress_percentage,
        time_elapsed_percentage,
        status
    );

    Ok(GoalProgress {
        goal_id: goal.id.clone(),
        metric: goal.metric,
        target_value: goal.target_value,
        current_value,
        progress_percentage,
        time_elapsed_percentage,
        days_remaining,
        is_expired,
        status,
        projected_value,
        required_daily_rate,
        evaluated_at: now,
    })
}

/// Aggregates the metric over already-filtered records. Totals saturate at
/// the `Decimal` bounds instead of overflowing.
fn aggregate<'a>(metric: GoalMetric, records: impl Iterator<Item = &'a SaleRecord>) -> Decimal {
    let mut revenue = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    let mut units: i64 = 0;

    for record in records {
        revenue = revenue.saturating_add(record.revenue);
        cost = cost.saturating_add(record.cost);
        units = units.saturating_add(record.quantity);
    }

    match metric {
        GoalMetric::Revenue => revenue,
        GoalMetric::UnitsSold => Decimal::from(units),
        GoalMetric::Profit => revenue.saturating_sub(cost),
        GoalMetric::ProfitMargin => {
            if revenue.is_zero() {
                Decimal::ZERO
            } else {
                revenue
                    .saturating_sub(cost)
                    .checked_div(revenue)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .map(|margin| margin.round_dp(DECIMAL_PRECISION))
                    .unwrap_or(Decimal::ZERO)
            }
        }
    }
}

/// `value / whole * 100`, rounded and clamped to `[0, 100]`. Zero when
/// `whole` is not positive.
fn percentage_of(value: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let raw = value
        .checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    let pct = match raw {
        Some(pct) => pct.round_dp(DECIMAL_PRECISION),
        // Overflow only happens for values far beyond the target.
        None if value.is_sign_positive() => Decimal::ONE_HUNDRED,
        None => Decimal::ZERO,
    };
    pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Linear-trend forecast of the value at the end of the window.
fn project_value(
    metric: GoalMetric,
    current_value: Decimal,
    elapsed_days: Decimal,
    period_days: Decimal,
) -> Option<Decimal> {
    if elapsed_days <= Decimal::ZERO {
        return None;
    }
    if metric.is_ratio() {
        return Some(current_value);
    }
    // Past the window the current value is final.
    current_value
        .checked_div(elapsed_days.min(period_days))
        .and_then(|daily| daily.checked_mul(period_days))
        .map(|projected| projected.round_dp(DECIMAL_PRECISION))
}
