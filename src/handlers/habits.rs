//! Habit CRUD and check-in handlers.
//!
//! All routes require a session (see [`AuthUser`]) and only ever touch the
//! caller's own habits.

use super::auth::AuthUser;
use super::shared_types::{parse_habit_id, ApiError, JsonBody};
use crate::app_state::AppState;
use crate::domain::{self, CheckinLog, CreateHabitInput, Habit, HabitError, UpdateHabitInput};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HabitResponse {
    // ---
    pub success: bool,
    pub habit: Habit,
}

#[derive(Debug, Serialize)]
pub struct HabitListResponse {
    // ---
    pub success: bool,
    pub habits: Vec<Habit>,
}

#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    // ---
    pub success: bool,
    pub log: CheckinLog,
    pub habit: Habit,
}

#[derive(Debug, Serialize)]
pub struct CheckinListResponse {
    // ---
    pub success: bool,
    pub logs: Vec<CheckinLog>,
}

/// Body of `POST /habit/checkin`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequest {
    // ---
    pub habit_id: Option<String>,
    pub note: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /habit
///
/// Creates a habit for the caller. Only `title` is required; `frequency`
/// defaults to `daily` and `target` to 1.
///
/// # Errors
/// - 400 when the body is not valid JSON, the title is missing or blank, or
///   frequency/target are invalid
/// - 500 on storage failure
#[tracing::instrument(skip(state, user, input), fields(user_id = %user.user_id))]
pub async fn create_habit(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(input): JsonBody<CreateHabitInput>,
) -> Result<(StatusCode, Json<HabitResponse>), ApiError> {
    // ---
    let habit = domain::create_habit(state.repository(), user.user_id, input).await?;
    state.metrics().record_habit_created();

    Ok((
        StatusCode::CREATED,
        Json(HabitResponse {
            success: true,
            habit,
        }),
    ))
}

/// GET /habit
///
/// Lists the caller's habits, newest first.
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_habits(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<HabitListResponse>, ApiError> {
    // ---
    let habits = domain::list_habits(state.repository(), user.user_id).await?;

    Ok(Json(HabitListResponse {
        success: true,
        habits,
    }))
}

/// GET /habit/{id}
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_habit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<HabitResponse>, ApiError> {
    // ---
    let habit_id = parse_habit_id(&id)?;
    let habit = domain::get_habit(state.repository(), habit_id, user.user_id).await?;

    Ok(Json(HabitResponse {
        success: true,
        habit,
    }))
}

/// PATCH /habit/{id}
///
/// Updates any of `title`, `description`, `frequency`, `target` and
/// `enabled`. `"description": null` clears the description. Other fields in
/// the body are ignored; the streak cannot be edited here.
///
/// # Errors
/// - 400 when a provided field is invalid
/// - 404 when the habit does not exist or belongs to someone else
#[tracing::instrument(skip(state, user, input), fields(user_id = %user.user_id))]
pub async fn update_habit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateHabitInput>,
) -> Result<Json<HabitResponse>, ApiError> {
    // ---
    let habit_id = parse_habit_id(&id)?;
    let habit = domain::update_habit(state.repository(), habit_id, user.user_id, input).await?;

    tracing::info!("Updated habit {}", habit.id);

    Ok(Json(HabitResponse {
        success: true,
        habit,
    }))
}

/// POST /habit/checkin
///
/// Records today's (UTC) check-in for `habitId` and returns the new log
/// entry together with the habit's updated streak.
///
/// # Errors
/// - 400 when `habitId` is missing, the habit is disabled, or it was
///   already checked in today
/// - 404 when the habit does not exist or belongs to someone else
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.user_id))]
pub async fn check_in(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(request): JsonBody<CheckinRequest>,
) -> Result<(StatusCode, Json<CheckinResponse>), ApiError> {
    // ---
    let raw_id = request
        .habit_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("habitId is required"))?;
    let habit_id = parse_habit_id(&raw_id)?;

    let result = domain::check_in(
        state.repository(),
        habit_id,
        user.user_id,
        Utc::now(),
        request.note,
    )
    .await;

    match result {
        Ok(receipt) => {
            state.metrics().record_checkin(receipt.habit.streak);
            Ok((
                StatusCode::CREATED,
                Json(CheckinResponse {
                    success: true,
                    log: receipt.log,
                    habit: receipt.habit,
                }),
            ))
        }
        Err(err) => {
            if let Some(reason) = rejection_reason(&err) {
                state.metrics().record_checkin_rejected(reason);
            }
            Err(err.into())
        }
    }
}

/// GET /habit/{id}/checkins
///
/// Check-in history of one habit, newest first.
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_checkins(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CheckinListResponse>, ApiError> {
    // ---
    let habit_id = parse_habit_id(&id)?;
    let logs = domain::list_checkins(state.repository(), habit_id, user.user_id).await?;

    Ok(Json(CheckinListResponse {
        success: true,
        logs,
    }))
}

fn rejection_reason(err: &HabitError) -> Option<&'static str> {
    // ---
    match err {
        HabitError::DuplicateCheckin => Some("duplicate"),
        HabitError::HabitDisabled => Some("disabled"),
        HabitError::Conflict(_) => Some("conflict"),
        HabitError::NotFound => Some("not_found"),
        HabitError::Validation(_) | HabitError::Storage(_) => None,
    }
}
