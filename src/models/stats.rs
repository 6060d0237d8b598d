// SPDX-License-Identifier: MIT

//! Computed activity statistics. Never stored; derived fresh from the
//! session history on every request.

use serde::Serialize;

/// Dashboard stats over the recent session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Sessions completed in the last 30 days
    pub total_workouts: u32,
    /// Sessions completed in the last 7 days
    pub weekly_workouts: u32,
    /// Consecutive calendar days with at least one session, walking
    /// backward from today (a gap on today itself is tolerated)
    pub streak: u32,
}

/// One bucket of the 7-day activity histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    /// Abbreviated weekday name ("Sun".."Sat")
    pub day: &'static str,
    /// Sessions completed on this calendar day
    pub workouts: u32,
    /// Total minutes across this day's sessions (missing durations count as 0)
    pub duration: u32,
}

/// Result of an AI-quota check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub can_ask: bool,
    /// Questions remaining today; -1 means unlimited (Pro)
    pub questions_left: i32,
}
