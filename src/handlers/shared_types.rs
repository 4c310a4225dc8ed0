use crate::domain::HabitError;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

/// Body of every failed request: `{ "success": false, "message": ... }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    // ---
    pub success: bool,
    pub message: String,
}

/// Error returned by handlers, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    // ---
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    // ---
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        // ---
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<HabitError> for ApiError {
    fn from(err: HabitError) -> Self {
        // ---
        match err {
            HabitError::Validation(_)
            | HabitError::HabitDisabled
            | HabitError::DuplicateCheckin
            | HabitError::Conflict(_) => ApiError::bad_request(err.to_string()),
            HabitError::NotFound => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            HabitError::Storage(e) => {
                // Details stay in the log; clients get a generic message.
                tracing::error!("Storage failure: {:#}", e);
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // ---
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let body = ErrorResponse {
            success: false,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// JSON request body whose rejections (wrong content type, syntax or field
/// types) come back as `400 { "success": false, "message": ... }`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Parses an id taken from the path or body.
///
/// Anything that is not a UUID cannot name an existing habit, so it is
/// reported as not found rather than as a malformed request.
pub fn parse_habit_id(raw: &str) -> Result<Uuid, ApiError> {
    // ---
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::from(HabitError::NotFound))
}
