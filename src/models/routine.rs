// SPDX-License-Identifier: MIT

//! Workout routine model and write payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stored workout routine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRoutine {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    /// Ordered list of exercise descriptions
    pub exercises: Vec<String>,
}

/// Payload for creating a routine. The owner comes from the session, not the body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRoutine {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 600, message = "must be 1-600 minutes"))]
    pub duration_minutes: Option<i32>,
    #[validate(length(min = 1, message = "must list at least one exercise"))]
    pub exercises: Vec<String>,
}

/// Partial update for a routine; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoutinePatch {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 600, message = "must be 1-600 minutes"))]
    pub duration_minutes: Option<i32>,
    #[validate(length(min = 1, message = "must list at least one exercise"))]
    pub exercises: Option<Vec<String>>,
}

impl WorkoutRoutine {
    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &RoutinePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(duration) = patch.duration_minutes {
            self.duration_minutes = Some(duration);
        }
        if let Some(exercises) = &patch.exercises {
            self.exercises = exercises.clone();
        }
    }
}
