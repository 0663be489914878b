//! Application-wide constants.

/// Number of decimal places money amounts are rounded to at display and
/// aggregation points.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Canceled plans contribute to savings analytics for this many trailing
/// months (window starts at the first day of the month).
pub const CANCELED_PLAN_WINDOW_MONTHS: u32 = 3;

/// Assumed total member count for a canceled monthly plan when no
/// historical member count was captured.
pub const MONTHLY_FALLBACK_MEMBER_COUNT: i64 = 2;
