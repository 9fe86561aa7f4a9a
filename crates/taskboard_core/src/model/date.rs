//! Due-date validation and formatting.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DUE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid due date regex"));

const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 9999;

/// Returns whether `value` is a zero-padded `YYYY-MM-DD` calendar date.
///
/// Years outside `1000..=9999` are rejected. February 29 is accepted only in
/// leap years.
pub fn is_valid_due_date(value: &str) -> bool {
    let Some(caps) = DUE_DATE_RE.captures(value) else {
        return false;
    };
    let (Ok(year), Ok(month), Ok(day)) = (
        caps[1].parse::<i32>(),
        caps[2].parse::<u32>(),
        caps[3].parse::<u32>(),
    ) else {
        return false;
    };
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return false;
    }
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Formats a calendar date in the persisted `YYYY-MM-DD` shape.
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
