// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod affirmation;
pub mod routine;
pub mod session;
pub mod settings;
pub mod stats;
pub mod user;

pub use affirmation::AffirmationEntry;
pub use routine::{NewRoutine, RoutinePatch, WorkoutRoutine};
pub use session::{NewSession, WorkoutSession};
pub use settings::{SettingsPatch, UserSettings};
pub use stats::{DayActivity, QuotaStatus, UserStats};
pub use user::User;
