//! Currency, date and description formatting

use chrono::{Datelike, NaiveDate};

/// Number of description characters kept in the item table
pub const DESCRIPTION_LIMIT: usize = 32;

/// Format an amount as dollars with two decimals
///
/// Halfway values round away from zero and negative zero prints as `$0.00`.
///
/// # Examples
/// ```
/// use invoice::format_currency;
/// assert_eq!(format_currency(19.999), "$20.00");
/// assert_eq!(format_currency(0.125), "$0.13");
/// assert_eq!(format_currency(0.0), "$0.00");
/// ```
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", round_cents(amount))
}

/// Round exact halfway cents away from zero
///
/// Only multiples of 1/8 can sit exactly halfway between two cents, and for
/// those `amount * 100.0` is exact. Every other value is left to the
/// correctly rounded `{:.2}` formatting.
fn round_cents(amount: f64) -> f64 {
    if amount == 0.0 {
        return 0.0;
    }
    if (amount * 8.0).fract() == 0.0 {
        (amount * 100.0).round() / 100.0
    } else {
        amount
    }
}

/// Format a date as `YYYY/M/D` without zero padding
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use invoice::format_date;
/// let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
/// assert_eq!(format_date(date), "2024/3/7");
/// ```
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.year(), date.month(), date.day())
}

/// Cut a description to its first 32 characters and append `...`
///
/// The ellipsis is appended even when nothing was cut.
pub fn truncate_description(description: &str) -> String {
    let mut out: String = description.chars().take(DESCRIPTION_LIMIT).collect();
    out.push_str("...");
    out
}
