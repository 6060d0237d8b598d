// SPDX-License-Identifier: MIT

//! SQLite storage backend (sqlx).
//!
//! Schema is created on startup via [`SqliteStorage::migrate`]. Timestamps
//! are stored as RFC3339 TEXT, dates as "YYYY-MM-DD" TEXT, and the routine
//! exercise list as a JSON array.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::{
    AffirmationEntry, RoutinePatch, SettingsPatch, User, UserSettings, WorkoutRoutine,
    WorkoutSession,
};
use crate::storage::Storage;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT,
    first_name TEXT,
    last_name TEXT,
    profile_image_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workout_routines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    duration_minutes INTEGER,
    exercises TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_routines_user ON workout_routines(user_id);

CREATE TABLE IF NOT EXISTS workout_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    routine_id INTEGER,
    duration_minutes INTEGER,
    completed_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_user_completed
    ON workout_sessions(user_id, completed_at);

CREATE TABLE IF NOT EXISTS user_settings (
    user_id TEXT PRIMARY KEY,
    workout_reminder_enabled INTEGER NOT NULL,
    workout_reminder_time TEXT NOT NULL,
    affirmation_enabled INTEGER NOT NULL,
    affirmation_time TEXT NOT NULL,
    dark_mode INTEGER NOT NULL,
    notifications_enabled INTEGER NOT NULL,
    is_pro INTEGER NOT NULL,
    pro_expires_at TEXT,
    daily_ai_questions INTEGER NOT NULL,
    last_ai_question_date TEXT
);

CREATE TABLE IF NOT EXISTS affirmation_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    affirmation TEXT NOT NULL,
    date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_affirmations_user ON affirmation_history(user_id, date);
"#;

/// SQLite-backed storage, interchangeable with the in-memory backend.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (creating if missing) the database at `database_url`.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(db_err)?
            .create_if_missing(true);

        // A `:memory:` database exists per connection, so the pool must not
        // grow past one or the schema vanishes between queries.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(db_err)?;

        tracing::info!(url = database_url, "Connected to SQLite");
        Ok(Self { pool })
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

fn db_err(e: impl std::fmt::Display) -> AppError {
    AppError::Database(e.to_string())
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(db_err)?,
        email: row.try_get("email").map_err(db_err)?,
        first_name: row.try_get("first_name").map_err(db_err)?,
        last_name: row.try_get("last_name").map_err(db_err)?,
        profile_image_url: row.try_get("profile_image_url").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn routine_from_row(row: &SqliteRow) -> Result<WorkoutRoutine> {
    let exercises_json: String = row.try_get("exercises").map_err(db_err)?;
    let exercises = serde_json::from_str(&exercises_json)
        .map_err(|e| AppError::Database(format!("Corrupt exercises column: {}", e)))?;

    Ok(WorkoutRoutine {
        id: row.try_get("id").map_err(db_err)?,
        user_id: row.try_get("user_id").map_err(db_err)?,
        name: row.try_get("name").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        duration_minutes: row.try_get("duration_minutes").map_err(db_err)?,
        exercises,
    })
}

fn session_from_row(row: &SqliteRow) -> Result<WorkoutSession> {
    Ok(WorkoutSession {
        id: row.try_get("id").map_err(db_err)?,
        user_id: row.try_get("user_id").map_err(db_err)?,
        routine_id: row.try_get("routine_id").map_err(db_err)?,
        duration_minutes: row.try_get("duration_minutes").map_err(db_err)?,
        completed_at: row.try_get("completed_at").map_err(db_err)?,
    })
}

fn settings_from_row(row: &SqliteRow) -> Result<UserSettings> {
    Ok(UserSettings {
        user_id: row.try_get("user_id").map_err(db_err)?,
        workout_reminder_enabled: row.try_get("workout_reminder_enabled").map_err(db_err)?,
        workout_reminder_time: row.try_get("workout_reminder_time").map_err(db_err)?,
        affirmation_enabled: row.try_get("affirmation_enabled").map_err(db_err)?,
        affirmation_time: row.try_get("affirmation_time").map_err(db_err)?,
        dark_mode: row.try_get("dark_mode").map_err(db_err)?,
        notifications_enabled: row.try_get("notifications_enabled").map_err(db_err)?,
        is_pro: row.try_get("is_pro").map_err(db_err)?,
        pro_expires_at: row.try_get("pro_expires_at").map_err(db_err)?,
        daily_ai_questions: row.try_get("daily_ai_questions").map_err(db_err)?,
        last_ai_question_date: row.try_get("last_ai_question_date").map_err(db_err)?,
    })
}

fn affirmation_from_row(row: &SqliteRow) -> Result<AffirmationEntry> {
    Ok(AffirmationEntry {
        id: row.try_get("id").map_err(db_err)?,
        user_id: row.try_get("user_id").map_err(db_err)?,
        affirmation: row.try_get("affirmation").map_err(db_err)?,
        date: row.try_get("date").map_err(db_err)?,
    })
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn upsert_user(&self, user: &User) -> Result<User> {
        sqlx::query(
            "INSERT INTO users (id, email, first_name, last_name, profile_image_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 email = excluded.email,
                 first_name = excluded.first_name,
                 last_name = excluded.last_name,
                 profile_image_url = excluded.profile_image_url,
                 updated_at = excluded.updated_at",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_user(&user.id)
            .await?
            .ok_or_else(|| AppError::Database("Upserted user not found".to_string()))
    }

    async fn list_routines(&self, user_id: &str) -> Result<Vec<WorkoutRoutine>> {
        let rows = sqlx::query("SELECT * FROM workout_routines WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(routine_from_row).collect()
    }

    async fn get_routine(&self, id: i64) -> Result<Option<WorkoutRoutine>> {
        let row = sqlx::query("SELECT * FROM workout_routines WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(routine_from_row).transpose()
    }

    async fn create_routine(&self, routine: &WorkoutRoutine) -> Result<WorkoutRoutine> {
        let exercises_json =
            serde_json::to_string(&routine.exercises).map_err(db_err)?;

        let result = sqlx::query(
            "INSERT INTO workout_routines (user_id, name, description, duration_minutes, exercises)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&routine.user_id)
        .bind(&routine.name)
        .bind(&routine.description)
        .bind(routine.duration_minutes)
        .bind(&exercises_json)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(WorkoutRoutine {
            id: result.last_insert_rowid(),
            ..routine.clone()
        })
    }

    async fn update_routine(
        &self,
        id: i64,
        patch: &RoutinePatch,
    ) -> Result<Option<WorkoutRoutine>> {
        // Read-modify-write: partial updates share UserSettings/Routine apply()
        // logic with the in-memory backend.
        let Some(mut routine) = self.get_routine(id).await? else {
            return Ok(None);
        };
        routine.apply(patch);

        let exercises_json =
            serde_json::to_string(&routine.exercises).map_err(db_err)?;

        sqlx::query(
            "UPDATE workout_routines
             SET name = ?, description = ?, duration_minutes = ?, exercises = ?
             WHERE id = ?",
        )
        .bind(&routine.name)
        .bind(&routine.description)
        .bind(routine.duration_minutes)
        .bind(&exercises_json)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(Some(routine))
    }

    async fn delete_routine(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workout_routines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_recent_sessions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<WorkoutSession>> {
        let rows = sqlx::query(
            "SELECT * FROM workout_sessions
             WHERE user_id = ? AND completed_at >= ?
             ORDER BY completed_at",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(session_from_row).collect()
    }

    async fn create_session(&self, session: &WorkoutSession) -> Result<WorkoutSession> {
        let result = sqlx::query(
            "INSERT INTO workout_sessions (user_id, routine_id, duration_minutes, completed_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&session.user_id)
        .bind(session.routine_id)
        .bind(session.duration_minutes)
        .bind(session.completed_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(WorkoutSession {
            id: result.last_insert_rowid(),
            ..session.clone()
        })
    }

    async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        let row = sqlx::query("SELECT * FROM user_settings WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(settings_from_row).transpose()
    }

    async fn update_settings(
        &self,
        user_id: &str,
        patch: &SettingsPatch,
    ) -> Result<UserSettings> {
        // No transaction around the read-modify-write: concurrent quota
        // updates for the same user may race, last write wins.
        let mut settings = self
            .get_settings(user_id)
            .await?
            .unwrap_or_else(|| UserSettings::defaults_for(user_id));
        settings.apply(patch);

        sqlx::query(
            "INSERT INTO user_settings (user_id, workout_reminder_enabled, workout_reminder_time,
                 affirmation_enabled, affirmation_time, dark_mode, notifications_enabled,
                 is_pro, pro_expires_at, daily_ai_questions, last_ai_question_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 workout_reminder_enabled = excluded.workout_reminder_enabled,
                 workout_reminder_time = excluded.workout_reminder_time,
                 affirmation_enabled = excluded.affirmation_enabled,
                 affirmation_time = excluded.affirmation_time,
                 dark_mode = excluded.dark_mode,
                 notifications_enabled = excluded.notifications_enabled,
                 is_pro = excluded.is_pro,
                 pro_expires_at = excluded.pro_expires_at,
                 daily_ai_questions = excluded.daily_ai_questions,
                 last_ai_question_date = excluded.last_ai_question_date",
        )
        .bind(&settings.user_id)
        .bind(settings.workout_reminder_enabled)
        .bind(&settings.workout_reminder_time)
        .bind(settings.affirmation_enabled)
        .bind(&settings.affirmation_time)
        .bind(settings.dark_mode)
        .bind(settings.notifications_enabled)
        .bind(settings.is_pro)
        .bind(settings.pro_expires_at)
        .bind(settings.daily_ai_questions)
        .bind(settings.last_ai_question_date)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(settings)
    }

    async fn list_affirmations(&self, user_id: &str) -> Result<Vec<AffirmationEntry>> {
        let rows = sqlx::query(
            "SELECT * FROM affirmation_history WHERE user_id = ? ORDER BY date, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(affirmation_from_row).collect()
    }

    async fn add_affirmation(
        &self,
        user_id: &str,
        affirmation: &str,
        date: NaiveDate,
    ) -> Result<AffirmationEntry> {
        let result = sqlx::query(
            "INSERT INTO affirmation_history (user_id, affirmation, date) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(affirmation)
        .bind(date)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(AffirmationEntry {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            affirmation: affirmation.to_string(),
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_storage() -> SqliteStorage {
        let storage = SqliteStorage::new("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        storage.migrate().await.expect("migrate");
        storage
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let storage = test_storage().await;
        storage.migrate().await.expect("second migrate");
    }

    #[tokio::test]
    async fn test_routine_round_trip_preserves_exercises() {
        let storage = test_storage().await;
        let created = storage
            .create_routine(&WorkoutRoutine {
                id: 0,
                user_id: "u1".to_string(),
                name: "Upper Body".to_string(),
                description: Some("Strength focus".to_string()),
                duration_minutes: Some(45),
                exercises: vec![
                    "Push-ups - 3 sets of 12".to_string(),
                    "Pull-ups - 3 sets of 8".to_string(),
                ],
            })
            .await
            .unwrap();

        let fetched = storage.get_routine(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.exercises.len(), 2);
        assert_eq!(fetched.exercises[0], "Push-ups - 3 sets of 12");
    }

    #[tokio::test]
    async fn test_settings_upsert_keeps_single_record() {
        let storage = test_storage().await;

        let first = storage.get_or_create_settings("u1").await.unwrap();
        assert!(!first.is_pro);

        let upgraded = storage
            .update_settings(
                "u1",
                &SettingsPatch {
                    is_pro: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(upgraded.is_pro);

        // Still defaults for untouched fields
        assert_eq!(upgraded.workout_reminder_time, "08:00");
    }

    #[tokio::test]
    async fn test_sessions_since_filter() {
        let storage = test_storage().await;
        let now = Utc::now();

        for days_ago in [35, 3] {
            storage
                .create_session(&WorkoutSession {
                    id: 0,
                    user_id: "u1".to_string(),
                    routine_id: None,
                    duration_minutes: Some(20),
                    completed_at: now - chrono::Duration::days(days_ago),
                })
                .await
                .unwrap();
        }

        let recent = storage
            .list_recent_sessions("u1", now - chrono::Duration::days(30))
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
    }
}
