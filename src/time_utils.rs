// SPDX-License-Identifier: MIT

//! Shared helpers for calendar-day bucketing.
//!
//! All day-boundary math in this crate uses UTC. Session timestamps are
//! truncated to their UTC calendar date before any comparison so that two
//! sessions on the same day bucket together regardless of time of day.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

/// Current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Truncate a timestamp to its UTC calendar date.
pub fn utc_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Abbreviated weekday name ("Sun".."Sat") for a calendar date.
pub fn weekday_abbrev(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_weekday_abbrev() {
        // 2024-01-15 was a Monday
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(weekday_abbrev(date), "Mon");
        assert_eq!(weekday_abbrev(date.succ_opt().unwrap()), "Tue");
    }

    #[test]
    fn test_utc_day_strips_time() {
        let a = Utc.with_ymd_and_hms(2024, 1, 15, 0, 30, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap();
        assert_eq!(utc_day(a), utc_day(b));
    }
}
