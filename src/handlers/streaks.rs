use super::auth::AuthUser;
use super::shared_types::{parse_habit_id, ApiError};
use crate::app_state::AppState;
use crate::domain::{self, StreakSummary};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    // ---
    pub success: bool,
    pub streak: StreakSummary,
}

/// GET /streak/{habitId}
///
/// Returns the stored streak snapshot of a habit. Without a snapshot the
/// summary is derived from the habit itself and flagged `fallback: true`,
/// with `totalCheckIns: null`.
///
/// # Errors
/// - 404 when the habit does not exist or belongs to someone else
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_streak(
    State(state): State<AppState>,
    user: AuthUser,
    Path(habit_id): Path<String>,
) -> Result<Json<StreakResponse>, ApiError> {
    // ---
    let habit_id = parse_habit_id(&habit_id)?;
    let streak = domain::streak_summary(state.repository(), habit_id, user.user_id).await?;

    if streak.fallback {
        tracing::debug!("No snapshot for habit {}, derived from habit record", habit_id);
    }

    Ok(Json(StreakResponse {
        success: true,
        streak,
    }))
}
