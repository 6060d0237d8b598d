// SPDX-License-Identifier: MIT

//! Per-user settings: preferences, Pro-tier status, and AI-quota counters.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One settings record per user, created lazily with defaults on first access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_id: String,
    pub workout_reminder_enabled: bool,
    /// "HH:MM" local wall-clock time for the reminder notification
    pub workout_reminder_time: String,
    pub affirmation_enabled: bool,
    pub affirmation_time: String,
    pub dark_mode: bool,
    pub notifications_enabled: bool,
    pub is_pro: bool,
    pub pro_expires_at: Option<DateTime<Utc>>,
    /// AI questions asked on `last_ai_question_date` (free tier only)
    pub daily_ai_questions: i32,
    /// UTC calendar date of the most recent AI question
    pub last_ai_question_date: Option<NaiveDate>,
}

impl UserSettings {
    /// Default settings for a new user.
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            workout_reminder_enabled: true,
            workout_reminder_time: "08:00".to_string(),
            affirmation_enabled: true,
            affirmation_time: "07:00".to_string(),
            dark_mode: false,
            notifications_enabled: true,
            is_pro: false,
            pro_expires_at: None,
            daily_ai_questions: 0,
            last_ai_question_date: None,
        }
    }

    /// Apply a partial update in place. Absent fields are left unchanged.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.workout_reminder_enabled {
            self.workout_reminder_enabled = v;
        }
        if let Some(v) = &patch.workout_reminder_time {
            self.workout_reminder_time = v.clone();
        }
        if let Some(v) = patch.affirmation_enabled {
            self.affirmation_enabled = v;
        }
        if let Some(v) = &patch.affirmation_time {
            self.affirmation_time = v.clone();
        }
        if let Some(v) = patch.dark_mode {
            self.dark_mode = v;
        }
        if let Some(v) = patch.notifications_enabled {
            self.notifications_enabled = v;
        }
        if let Some(v) = patch.is_pro {
            self.is_pro = v;
        }
        if let Some(v) = patch.pro_expires_at {
            self.pro_expires_at = Some(v);
        }
        if let Some(v) = patch.daily_ai_questions {
            self.daily_ai_questions = v;
        }
        if let Some(v) = patch.last_ai_question_date {
            self.last_ai_question_date = Some(v);
        }
    }
}

/// Partial settings update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub workout_reminder_enabled: Option<bool>,
    pub workout_reminder_time: Option<String>,
    pub affirmation_enabled: Option<bool>,
    pub affirmation_time: Option<String>,
    pub dark_mode: Option<bool>,
    pub notifications_enabled: Option<bool>,
    pub is_pro: Option<bool>,
    pub pro_expires_at: Option<DateTime<Utc>>,
    pub daily_ai_questions: Option<i32>,
    pub last_ai_question_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = UserSettings::defaults_for("u1");
        assert!(settings.workout_reminder_enabled);
        assert_eq!(settings.workout_reminder_time, "08:00");
        assert_eq!(settings.affirmation_time, "07:00");
        assert!(!settings.is_pro);
        assert_eq!(settings.daily_ai_questions, 0);
        assert!(settings.last_ai_question_date.is_none());
    }

    #[test]
    fn test_apply_partial_patch() {
        let mut settings = UserSettings::defaults_for("u1");
        settings.apply(&SettingsPatch {
            dark_mode: Some(true),
            daily_ai_questions: Some(2),
            ..Default::default()
        });

        assert!(settings.dark_mode);
        assert_eq!(settings.daily_ai_questions, 2);
        // Untouched fields keep their defaults
        assert!(settings.workout_reminder_enabled);
        assert!(!settings.is_pro);
    }
}
