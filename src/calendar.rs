//! Calendar arithmetic and day labels for a billing month.
//!
//! Months are zero-indexed throughout (0 = January), matching the host contract.

use chrono::{Datelike, Local};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in `month0` of `year`; 0 for a month outside `0..=11`.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    match DAYS_IN_MONTH.get(month0 as usize) {
        Some(_) if month0 == 1 && is_leap_year(year) => 29,
        Some(d) => *d,
        None => 0,
    }
}

/// `["Jan 1", "Jan 2", ...]` for every day of the month.
pub fn month_labels(year: i32, month0: u32) -> Vec<String> {
    let Some(name) = MONTH_NAMES.get(month0 as usize) else {
        return Vec::new();
    };
    (1..=days_in_month(year, month0))
        .map(|day| format!("{name} {day}"))
        .collect()
}

/// The current local `(year, month0)`.
pub fn current_period() -> (i32, u32) {
    let now = Local::now();
    (now.year(), now.month0())
}

/// Day labels for the given period, or for the current one when either part is missing.
pub fn usage_labels(year: Option<i32>, month0: Option<u32>) -> Vec<String> {
    let (year, month0) = match (year, month0) {
        (Some(y), Some(m)) => (y, m),
        _ => current_period(),
    };
    month_labels(year, month0)
}
