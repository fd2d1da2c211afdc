/// Decimal precision for percentages and derived values
pub const DECIMAL_PRECISION: u32 = 6;

/// Longest measurement window a goal may declare, in days
pub const MAX_PERIOD_DAYS: u32 = 3650;

/// Standard period tokens offered when creating a goal
pub const PERIOD_7_DAYS: &str = "7d";
pub const PERIOD_30_DAYS: &str = "30d";
pub const PERIOD_90_DAYS: &str = "90d";
pub const PERIOD_180_DAYS: &str = "180d";
pub const PERIOD_365_DAYS: &str = "365d";

pub const STANDARD_PERIODS: [&str; 5] = [
    PERIOD_7_DAYS,
    PERIOD_30_DAYS,
    PERIOD_90_DAYS,
    PERIOD_180_DAYS,
    PERIOD_365_DAYS,
];

/// Period used when a goal is created without one
pub const DEFAULT_GOAL_PERIOD: &str = PERIOD_30_DAYS;

/// Milliseconds in one day, used for fractional day arithmetic
pub const MILLIS_PER_DAY: i64 = 86_400_000;
