// SPDX-License-Identifier: MIT

//! In-memory storage backend.
//!
//! Backs tests and database-less local development. Each instance is an
//! isolated store, so every test gets a fresh world.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;

use crate::error::Result;
use crate::models::{
    AffirmationEntry, RoutinePatch, SettingsPatch, User, UserSettings, WorkoutRoutine,
    WorkoutSession,
};
use crate::storage::Storage;

/// Concurrent-map storage, interchangeable with the SQLite backend.
#[derive(Default)]
pub struct MemoryStorage {
    users: DashMap<String, User>,
    routines: DashMap<i64, WorkoutRoutine>,
    sessions: DashMap<i64, WorkoutSession>,
    settings: DashMap<String, UserSettings>,
    affirmations: DashMap<i64, AffirmationEntry>,
    next_id: AtomicI64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.get(user_id).map(|u| u.clone()))
    }

    async fn upsert_user(&self, user: &User) -> Result<User> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn list_routines(&self, user_id: &str) -> Result<Vec<WorkoutRoutine>> {
        let mut routines: Vec<WorkoutRoutine> = self
            .routines
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.clone())
            .collect();
        routines.sort_by_key(|r| r.id);
        Ok(routines)
    }

    async fn get_routine(&self, id: i64) -> Result<Option<WorkoutRoutine>> {
        Ok(self.routines.get(&id).map(|r| r.clone()))
    }

    async fn create_routine(&self, routine: &WorkoutRoutine) -> Result<WorkoutRoutine> {
        let stored = WorkoutRoutine {
            id: self.allocate_id(),
            ..routine.clone()
        };
        self.routines.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_routine(
        &self,
        id: i64,
        patch: &RoutinePatch,
    ) -> Result<Option<WorkoutRoutine>> {
        match self.routines.get_mut(&id) {
            Some(mut routine) => {
                routine.apply(patch);
                Ok(Some(routine.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_routine(&self, id: i64) -> Result<bool> {
        Ok(self.routines.remove(&id).is_some())
    }

    async fn list_recent_sessions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<WorkoutSession>> {
        let mut sessions: Vec<WorkoutSession> = self
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.completed_at >= since)
            .map(|s| s.clone())
            .collect();
        sessions.sort_by_key(|s| s.completed_at);
        Ok(sessions)
    }

    async fn create_session(&self, session: &WorkoutSession) -> Result<WorkoutSession> {
        let stored = WorkoutSession {
            id: self.allocate_id(),
            ..session.clone()
        };
        self.sessions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        Ok(self.settings.get(user_id).map(|s| s.clone()))
    }

    async fn update_settings(
        &self,
        user_id: &str,
        patch: &SettingsPatch,
    ) -> Result<UserSettings> {
        let mut entry = self
            .settings
            .entry(user_id.to_string())
            .or_insert_with(|| UserSettings::defaults_for(user_id));
        entry.apply(patch);
        Ok(entry.clone())
    }

    async fn list_affirmations(&self, user_id: &str) -> Result<Vec<AffirmationEntry>> {
        let mut entries: Vec<AffirmationEntry> = self
            .affirmations
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.clone())
            .collect();
        entries.sort_by_key(|a| (a.date, a.id));
        Ok(entries)
    }

    async fn add_affirmation(
        &self,
        user_id: &str,
        affirmation: &str,
        date: NaiveDate,
    ) -> Result<AffirmationEntry> {
        let entry = AffirmationEntry {
            id: self.allocate_id(),
            user_id: user_id.to_string(),
            affirmation: affirmation.to_string(),
            date,
        };
        self.affirmations.insert(entry.id, entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine(user_id: &str, name: &str) -> WorkoutRoutine {
        WorkoutRoutine {
            id: 0,
            user_id: user_id.to_string(),
            name: name.to_string(),
            description: None,
            duration_minutes: Some(45),
            exercises: vec!["Push-ups - 3 sets of 12".to_string()],
        }
    }

    #[tokio::test]
    async fn test_routine_crud() {
        let storage = MemoryStorage::new();

        let created = storage.create_routine(&routine("u1", "Upper Body")).await.unwrap();
        assert!(created.id > 0);

        let updated = storage
            .update_routine(
                created.id,
                &RoutinePatch {
                    name: Some("Upper Body Strength".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("routine exists");
        assert_eq!(updated.name, "Upper Body Strength");

        assert!(storage.delete_routine(created.id).await.unwrap());
        assert!(!storage.delete_routine(created.id).await.unwrap());
        assert!(storage.get_routine(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_routines_scoped_to_user() {
        let storage = MemoryStorage::new();
        storage.create_routine(&routine("u1", "A")).await.unwrap();
        storage.create_routine(&routine("u2", "B")).await.unwrap();

        let routines = storage.list_routines("u1").await.unwrap();
        assert_eq!(routines.len(), 1);
        assert_eq!(routines[0].name, "A");
    }

    #[tokio::test]
    async fn test_recent_sessions_filtered_and_ordered() {
        let storage = MemoryStorage::new();
        let now = Utc::now();

        for days_ago in [40, 2, 1] {
            storage
                .create_session(&WorkoutSession {
                    id: 0,
                    user_id: "u1".to_string(),
                    routine_id: None,
                    duration_minutes: Some(30),
                    completed_at: now - chrono::Duration::days(days_ago),
                })
                .await
                .unwrap();
        }

        let recent = storage
            .list_recent_sessions("u1", now - chrono::Duration::days(30))
            .await
            .unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].completed_at <= recent[1].completed_at);
    }

    #[tokio::test]
    async fn test_settings_created_lazily_with_defaults() {
        let storage = MemoryStorage::new();
        assert!(storage.get_settings("u1").await.unwrap().is_none());

        let settings = storage.get_or_create_settings("u1").await.unwrap();
        assert_eq!(settings.user_id, "u1");
        assert!(!settings.is_pro);
        assert_eq!(settings.daily_ai_questions, 0);

        // Exactly one record per user: a patch mutates the same record
        let patched = storage
            .update_settings(
                "u1",
                &SettingsPatch {
                    dark_mode: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(patched.dark_mode);
        assert_eq!(storage.get_or_create_settings("u1").await.unwrap().user_id, "u1");
    }
}
