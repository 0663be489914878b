//! Shared parsing helpers for TEXT-encoded values.

use std::str::FromStr;

use chrono::NaiveDate;
use log::error;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;

/// Parses a TEXT column into a Decimal, falling back through f64 to ZERO
/// so a single corrupt row cannot poison a whole listing.
pub fn parse_decimal_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(dec_err) => match f64::from_str(value_str) {
            Ok(f_val) => match Decimal::from_f64(f_val) {
                Some(d) => d,
                None => {
                    error!(
                        "Failed to convert {} '{}' (parsed as f64: {}) to Decimal.",
                        field_name, value_str, f_val
                    );
                    Decimal::ZERO
                }
            },
            Err(f_err) => {
                error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as f64 (err: {}). Falling back to ZERO.",
                    field_name, value_str, dec_err, f_err
                );
                Decimal::ZERO
            }
        },
    }
}

/// Parses a TEXT column holding an ISO date, falling back to the epoch
/// date with an error log.
pub fn parse_date_tolerant(value_str: &str, field_name: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value_str, "%Y-%m-%d").unwrap_or_else(|e| {
        error!("Failed to parse {} '{}': {}", field_name, value_str, e);
        NaiveDate::default()
    })
}

/// Serializes a date for a TEXT column.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
