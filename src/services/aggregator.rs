// SPDX-License-Identifier: MIT

//! User-activity aggregation: streak stats, the weekly histogram, and the
//! AI-question quota state machine.
//!
//! The stat computations are pure functions over already-loaded sessions;
//! nothing here is cached or stored. The quota operations read and write
//! the settings record through [`Storage`].

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use crate::error::Result;
use crate::models::{DayActivity, QuotaStatus, SettingsPatch, UserSettings, UserStats, WorkoutSession};
use crate::storage::Storage;
use crate::time_utils::{today_utc, utc_day, weekday_abbrev};

/// Free-tier AI question limit per calendar day.
pub const DAILY_AI_QUESTION_LIMIT: i32 = 3;

/// How far back the streak walk looks.
const STREAK_WINDOW_DAYS: i64 = 30;

/// Length of a Pro subscription granted by the upgrade stub.
const PRO_TERM_DAYS: i64 = 30;

/// Derives read-only analytics from session history and manages quota state.
pub struct ActivityAggregator {
    storage: Arc<dyn Storage>,
}

impl ActivityAggregator {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Dashboard stats: 30-day total, 7-day total, and current streak.
    pub async fn get_stats(&self, user_id: &str) -> Result<UserStats> {
        let now = Utc::now();
        let sessions = self
            .storage
            .list_recent_sessions(user_id, now - Duration::days(30))
            .await?;
        let week_sessions = self
            .storage
            .list_recent_sessions(user_id, now - Duration::days(7))
            .await?;

        Ok(compute_stats(&sessions, &week_sessions, now.date_naive()))
    }

    /// Seven chronological day buckets ending today.
    pub async fn weekly_histogram(&self, user_id: &str) -> Result<Vec<DayActivity>> {
        let now = Utc::now();
        let sessions = self
            .storage
            .list_recent_sessions(user_id, now - Duration::days(7))
            .await?;

        Ok(compute_weekly_histogram(&sessions, now.date_naive()))
    }

    /// Check whether the user may ask another AI question today.
    ///
    /// A stale `last_ai_question_date` resets the counter as a persisted side
    /// effect. The reset path reports `questions_left` as if one question
    /// were already consumed; this mirrors the product's observed behavior.
    pub async fn can_ask_ai(&self, user_id: &str) -> Result<QuotaStatus> {
        let Some(settings) = self.storage.get_settings(user_id).await? else {
            // No settings record: fail closed.
            return Ok(QuotaStatus {
                can_ask: false,
                questions_left: 0,
            });
        };

        if settings.is_pro {
            return Ok(QuotaStatus {
                can_ask: true,
                questions_left: -1,
            });
        }

        let today = today_utc();
        let is_new_day = settings
            .last_ai_question_date
            .map_or(true, |date| date != today);

        if is_new_day {
            self.storage
                .update_settings(
                    user_id,
                    &SettingsPatch {
                        daily_ai_questions: Some(0),
                        last_ai_question_date: Some(today),
                        ..Default::default()
                    },
                )
                .await?;
            return Ok(QuotaStatus {
                can_ask: true,
                questions_left: DAILY_AI_QUESTION_LIMIT - 1,
            });
        }

        let questions_left = (DAILY_AI_QUESTION_LIMIT - settings.daily_ai_questions).max(0);
        Ok(QuotaStatus {
            can_ask: questions_left > 0,
            questions_left,
        })
    }

    /// Record one consumed AI question. No-op when the user has no settings.
    pub async fn increment_ai_questions(&self, user_id: &str) -> Result<()> {
        let Some(settings) = self.storage.get_settings(user_id).await? else {
            return Ok(());
        };

        self.storage
            .update_settings(
                user_id,
                &SettingsPatch {
                    daily_ai_questions: Some(settings.daily_ai_questions + 1),
                    last_ai_question_date: Some(today_utc()),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    /// Flip the user to Pro for one term and reset the question counter.
    /// Payment is out of scope; this is the whole "upgrade" flow.
    pub async fn upgrade_to_pro(&self, user_id: &str) -> Result<UserSettings> {
        self.storage
            .update_settings(
                user_id,
                &SettingsPatch {
                    is_pro: Some(true),
                    pro_expires_at: Some(Utc::now() + Duration::days(PRO_TERM_DAYS)),
                    daily_ai_questions: Some(0),
                    ..Default::default()
                },
            )
            .await
    }
}

/// Compute dashboard stats from the 30-day and 7-day session windows.
///
/// The streak walks backward from `today` one calendar day at a time and
/// stops at the first day without a session, except that a gap on today
/// itself is skipped (the user may simply not have worked out yet).
pub fn compute_stats(
    sessions: &[WorkoutSession],
    week_sessions: &[WorkoutSession],
    today: NaiveDate,
) -> UserStats {
    let active_days: HashSet<NaiveDate> =
        sessions.iter().map(|s| utc_day(s.completed_at)).collect();

    let mut streak = 0;
    for offset in 0..STREAK_WINDOW_DAYS {
        let day = today - Duration::days(offset);
        if active_days.contains(&day) {
            streak += 1;
        } else if offset == 0 {
            continue;
        } else {
            break;
        }
    }

    UserStats {
        total_workouts: sessions.len() as u32,
        weekly_workouts: week_sessions.len() as u32,
        streak,
    }
}

/// Bucket the last week's sessions into 7 chronological day buckets
/// ending today. Sessions on the same calendar day merge into one bucket.
pub fn compute_weekly_histogram(
    sessions: &[WorkoutSession],
    today: NaiveDate,
) -> Vec<DayActivity> {
    (0..7)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let mut workouts = 0;
            let mut duration = 0;
            for session in sessions {
                if utc_day(session.completed_at) == day {
                    workouts += 1;
                    duration += session.duration_minutes.unwrap_or(0).max(0) as u32;
                }
            }
            DayActivity {
                day: weekday_abbrev(day),
                workouts,
                duration,
            }
        })
        .collect()
}
