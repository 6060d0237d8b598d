// SPDX-License-Identifier: MIT

//! Storage layer: one trait, two interchangeable backends.
//!
//! The application is programmed against [`Storage`]; the SQLite backend
//! serves production and the in-memory backend serves tests and local
//! development without a database file.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::models::{
    AffirmationEntry, RoutinePatch, SettingsPatch, User, UserSettings, WorkoutRoutine,
    WorkoutSession,
};

/// Capability set the aggregator and API handlers need from persistence.
#[async_trait]
pub trait Storage: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Insert or update a user profile (called on every login).
    async fn upsert_user(&self, user: &User) -> Result<User>;

    // ─── Workout Routines ────────────────────────────────────────

    async fn list_routines(&self, user_id: &str) -> Result<Vec<WorkoutRoutine>>;

    async fn get_routine(&self, id: i64) -> Result<Option<WorkoutRoutine>>;

    /// Create a routine; the `id` field of the input is ignored and assigned.
    async fn create_routine(&self, routine: &WorkoutRoutine) -> Result<WorkoutRoutine>;

    /// Apply a partial update; returns None when the routine does not exist.
    async fn update_routine(&self, id: i64, patch: &RoutinePatch)
        -> Result<Option<WorkoutRoutine>>;

    /// Returns true when a routine was actually deleted.
    async fn delete_routine(&self, id: i64) -> Result<bool>;

    // ─── Workout Sessions ────────────────────────────────────────

    /// Sessions completed at or after `since`, ordered by completion time.
    async fn list_recent_sessions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<WorkoutSession>>;

    /// Append a completed session; the `id` field of the input is ignored.
    async fn create_session(&self, session: &WorkoutSession) -> Result<WorkoutSession>;

    // ─── User Settings ───────────────────────────────────────────

    async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>>;

    /// Apply a partial settings update, creating the record with defaults
    /// first when absent. Always returns the resulting record.
    async fn update_settings(&self, user_id: &str, patch: &SettingsPatch)
        -> Result<UserSettings>;

    /// Settings for a user, created with defaults when absent.
    async fn get_or_create_settings(&self, user_id: &str) -> Result<UserSettings> {
        match self.get_settings(user_id).await? {
            Some(settings) => Ok(settings),
            None => self.update_settings(user_id, &SettingsPatch::default()).await,
        }
    }

    // ─── Affirmation History ─────────────────────────────────────

    /// Affirmations shown to the user, ordered by date.
    async fn list_affirmations(&self, user_id: &str) -> Result<Vec<AffirmationEntry>>;

    async fn add_affirmation(
        &self,
        user_id: &str,
        affirmation: &str,
        date: NaiveDate,
    ) -> Result<AffirmationEntry>;
}
