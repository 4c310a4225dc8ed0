//! Bearer-token authentication for habit routes.
//!
//! Handlers take an [`AuthUser`] argument; Axum runs the extractor before
//! the handler body and rejects the request with `401` when the token is
//! missing, malformed, unknown or expired.

use super::shared_types::ApiError;
use crate::app_state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    // ---
    pub user_id: Uuid,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // ---
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                tracing::debug!("Missing Authorization header");
                ApiError::unauthorized("Missing Authorization header")
            })?
            .to_str()
            .map_err(|_| {
                tracing::debug!("Invalid Authorization header format");
                ApiError::unauthorized("Invalid Authorization header")
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::debug!("Authorization header missing Bearer prefix");
            ApiError::unauthorized("Invalid Authorization header format")
        })?;

        let session = state
            .sessions()
            .validate_session(token.trim())
            .await
            .map_err(|e| {
                tracing::error!("Session lookup failed: {:#}", e);
                ApiError::internal()
            })?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

        Ok(AuthUser {
            user_id: session.user_id,
            username: session.username,
        })
    }
}
