use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Habit Check-in API
Version: {version}

Available endpoints (Authorization: Bearer <session token>):
  - POST  /habit                 - Create a habit
  - GET   /habit                 - List your habits, newest first
  - GET   /habit/{{id}}            - Fetch one habit
  - PATCH /habit/{{id}}            - Update title, description, frequency, target, enabled
  - GET   /habit/{{id}}/checkins   - Check-in history of a habit
  - POST  /habit/checkin         - Check in today (UTC) and advance the streak
  - GET   /streak/{{habitId}}      - Streak summary of a habit

Unauthenticated:
  - GET   /health                - Light health check
  - GET   /health?mode=full      - Full health check (database and session store)
  - GET   /metrics               - Prometheus metrics
"#
    )
}
