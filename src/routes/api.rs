// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    AffirmationEntry, DayActivity, NewRoutine, NewSession, QuotaStatus, RoutinePatch,
    SettingsPatch, User, UserSettings, UserStats, WorkoutRoutine, WorkoutSession,
};
use crate::services::affirmations::affirmation_for_date;
use crate::time_utils::today_utc;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/user", get(get_auth_user))
        .route("/api/user/stats", get(get_stats))
        .route("/api/user/weekly-data", get(get_weekly_data))
        .route("/api/routines", get(list_routines).post(create_routine))
        .route(
            "/api/routines/{id}",
            put(update_routine).delete(delete_routine),
        )
        .route("/api/sessions", post(create_session))
        .route("/api/settings", get(get_settings).put(update_settings))
        .route("/api/ai/check", get(ai_check))
        .route("/api/ai/ask", post(ai_ask))
        .route("/api/upgrade-pro", post(upgrade_pro))
        .route("/api/affirmations/today", get(affirmation_today))
        .route("/api/affirmations/history", get(affirmation_history))
}

// ─── User Profile ────────────────────────────────────────────

/// Get the current user's profile.
async fn get_auth_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    let profile = state
        .storage
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;
    Ok(Json(profile))
}

// ─── Activity Stats ──────────────────────────────────────────

/// Dashboard stats: 30-day totals, weekly totals, and streak.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserStats>> {
    let stats = state.aggregator.get_stats(&user.user_id).await?;
    Ok(Json(stats))
}

/// Seven day buckets for the weekly activity chart.
async fn get_weekly_data(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<DayActivity>>> {
    let buckets = state.aggregator.weekly_histogram(&user.user_id).await?;
    Ok(Json(buckets))
}

// ─── Workout Routines ────────────────────────────────────────

async fn list_routines(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<WorkoutRoutine>>> {
    Ok(Json(state.storage.list_routines(&user.user_id).await?))
}

async fn create_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewRoutine>,
) -> Result<Json<WorkoutRoutine>> {
    payload.validate()?;

    let routine = state
        .storage
        .create_routine(&WorkoutRoutine {
            id: 0,
            user_id: user.user_id.clone(),
            name: payload.name,
            description: payload.description,
            duration_minutes: payload.duration_minutes,
            exercises: payload.exercises,
        })
        .await?;

    tracing::debug!(user_id = %user.user_id, routine_id = routine.id, "Routine created");
    Ok(Json(routine))
}

/// Look up a routine and confirm the caller owns it. A foreign routine is
/// reported as not-found rather than forbidden to avoid leaking existence.
async fn owned_routine(state: &AppState, user: &AuthUser, id: i64) -> Result<WorkoutRoutine> {
    state
        .storage
        .get_routine(id)
        .await?
        .filter(|r| r.user_id == user.user_id)
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", id)))
}

async fn update_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(patch): Json<RoutinePatch>,
) -> Result<Json<WorkoutRoutine>> {
    patch.validate()?;
    owned_routine(&state, &user, id).await?;

    let updated = state
        .storage
        .update_routine(id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", id)))?;
    Ok(Json(updated))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

async fn delete_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    owned_routine(&state, &user, id).await?;

    if !state.storage.delete_routine(id).await? {
        return Err(AppError::NotFound(format!("Routine {} not found", id)));
    }
    Ok(Json(DeleteResponse { success: true }))
}

// ─── Workout Sessions ────────────────────────────────────────

async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewSession>,
) -> Result<Json<WorkoutSession>> {
    payload.validate()?;

    let session = state
        .storage
        .create_session(&WorkoutSession {
            id: 0,
            user_id: user.user_id.clone(),
            routine_id: payload.routine_id,
            duration_minutes: payload.duration_minutes,
            completed_at: payload.completed_at.unwrap_or_else(Utc::now),
        })
        .await?;

    tracing::debug!(user_id = %user.user_id, session_id = session.id, "Session logged");
    Ok(Json(session))
}

// ─── User Settings ───────────────────────────────────────────

/// Get settings, creating the record with defaults on first access.
async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserSettings>> {
    Ok(Json(
        state.storage.get_or_create_settings(&user.user_id).await?,
    ))
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<UserSettings>> {
    Ok(Json(
        state.storage.update_settings(&user.user_id, &patch).await?,
    ))
}

// ─── AI Assistant ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
}

async fn ai_check(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<QuotaStatus>> {
    Ok(Json(state.aggregator.can_ask_ai(&user.user_id).await?))
}

async fn ai_ask(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    if payload.question.trim().is_empty() {
        return Err(AppError::BadRequest("Question is required".to_string()));
    }

    let quota = state.aggregator.can_ask_ai(&user.user_id).await?;
    if !quota.can_ask {
        return Err(AppError::QuotaExceeded);
    }

    let answer = state.assistant.ask(&payload.question).await;
    state.aggregator.increment_ai_questions(&user.user_id).await?;

    Ok(Json(AskResponse { answer }))
}

// ─── Pro Upgrade ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct UpgradeResponse {
    pub success: bool,
    pub settings: UserSettings,
}

/// Flip the user to Pro. Payment processing is out of scope.
async fn upgrade_pro(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UpgradeResponse>> {
    let settings = state.aggregator.upgrade_to_pro(&user.user_id).await?;
    tracing::info!(user_id = %user.user_id, "User upgraded to Pro");
    Ok(Json(UpgradeResponse {
        success: true,
        settings,
    }))
}

// ─── Affirmations ────────────────────────────────────────────

#[derive(Serialize)]
pub struct AffirmationResponse {
    pub affirmation: String,
    pub date: chrono::NaiveDate,
}

/// Today's affirmation, recorded into history once per day.
async fn affirmation_today(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<AffirmationResponse>> {
    let today = today_utc();
    let affirmation = affirmation_for_date(today);

    let already_recorded = state
        .storage
        .list_affirmations(&user.user_id)
        .await?
        .iter()
        .any(|entry| entry.date == today);
    if !already_recorded {
        state
            .storage
            .add_affirmation(&user.user_id, affirmation, today)
            .await?;
    }

    Ok(Json(AffirmationResponse {
        affirmation: affirmation.to_string(),
        date: today,
    }))
}

async fn affirmation_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<AffirmationEntry>>> {
    Ok(Json(state.storage.list_affirmations(&user.user_id).await?))
}
