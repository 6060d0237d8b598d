// SPDX-License-Identifier: MIT

//! Completed workout session model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A completed workout session. Append-only: created once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: i64,
    pub user_id: String,
    /// Routine this session followed, if any. No ownership implied.
    pub routine_id: Option<i64>,
    pub duration_minutes: Option<i32>,
    pub completed_at: DateTime<Utc>,
}

/// Payload for logging a completed session.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub routine_id: Option<i64>,
    #[validate(range(min = 1, max = 1440, message = "must be 1-1440 minutes"))]
    pub duration_minutes: Option<i32>,
    /// Defaults to the current time when omitted.
    pub completed_at: Option<DateTime<Utc>>,
}
