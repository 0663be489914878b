//! Renewal date arithmetic.
//!
//! Calendar-aware month addition via chrono, which clamps overflowing days
//! to the last day of the target month: 2024-01-31 + 1 month = 2024-02-29.

use chrono::{Months, NaiveDate};

use super::plans_model::RenewalFrequency;

/// Computes the next renewal date from a start date and a frequency.
pub fn next_renewal_date(start_date: NaiveDate, frequency: RenewalFrequency) -> NaiveDate {
    let months = match frequency {
        RenewalFrequency::Monthly => 1,
        RenewalFrequency::Quarterly => 3,
        RenewalFrequency::Yearly => 12,
    };
    start_date
        .checked_add_months(Months::new(months))
        .unwrap_or(start_date)
}

/// Whole days from `today` until `next_renewal`. Negative once the renewal
/// date has passed.
pub fn days_until_renewal(next_renewal: NaiveDate, today: NaiveDate) -> i64 {
    (next_renewal - today).num_days()
}
