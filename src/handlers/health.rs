use crate::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

#[derive(Deserialize)]
pub struct HealthQuery {
    mode: Option<String>,
}

/// Responds with the health status of the server.
///
/// - By default (no query parameters), performs a light check to confirm the web server
///   is running.
///
/// - If `mode=full` is passed as a query parameter, also checks that the habit store
///   and the session store are reachable.
///
/// # Responses
/// - `200 OK` with `{ "status": "ok" }` if the server (and its stores, in full mode) are healthy.
/// - `500 INTERNAL SERVER ERROR` with `{ "status": "error" }` if a store check fails in full mode.
pub async fn health_check(
    State(state): State<AppState>,
    Query(params): Query<HealthQuery>,
) -> (StatusCode, Json<HealthResponse>) {
    // ---
    if params.mode.as_deref() != Some("full") {
        return (StatusCode::OK, Json(HealthResponse { status: "ok" }));
    }

    if let Err(e) = state.repository().ping().await {
        tracing::error!("Habit store health check failed: {:#}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse { status: "error" }),
        );
    }

    if let Err(e) = state.sessions().ping().await {
        tracing::error!("Session store health check failed: {:#}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse { status: "error" }),
        );
    }

    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}
