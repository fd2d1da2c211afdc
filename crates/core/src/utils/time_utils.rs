use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::constants::MILLIS_PER_DAY;

/// Returns the span between two instants as fractional days.
///
/// The result is negative when `end` precedes `start`. Millisecond resolution
/// keeps the value exact in `Decimal`, so repeated calls with the same
/// instants always agree.
pub fn fractional_days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    let millis = (end - start).num_milliseconds();
    Decimal::from(millis) / Decimal::from(MILLIS_PER_DAY)
}

/// Same as [`fractional_days_between`] but never negative.
pub fn elapsed_days_since(start: DateTime<Utc>, now: DateTime<Utc>) -> Decimal {
    fractional_days_between(start, now).max(Decimal::ZERO)
}
