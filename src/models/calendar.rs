//! Calendar helpers: inclusive date ranges, week bucketing, month halves.

use chrono::{Datelike, Duration, NaiveDate};

use super::WEEK_START;

/// All dates from `start` to `end` inclusive, ascending. Empty when
/// `start > end`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// The first day (Sunday) of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    debug_assert_eq!(WEEK_START, chrono::Weekday::Sun);
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Whether the date falls in the first half of its month (days 1–15).
pub fn in_first_half(date: NaiveDate) -> bool {
    date.day() <= 15
}
