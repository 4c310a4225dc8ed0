// src/lib.rs
use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use handlers::*;

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;

// Hoist up only the public symbol(s)
pub use app_state::AppState;
pub use config::*;
pub use handlers::{ApiError, AuthUser, ErrorResponse};

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_metrics, // ---
    create_noop_metrics,
    create_postgres_repository,
    create_prom_metrics,
    create_redis_sessions,
    init_database_with_retry,
    MemoryRepository,
    MemorySessionStore,
    PostgresRepository,
    RedisSessionStore,
};

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults to debug output for this crate and the HTTP
/// layer. Safe to call more than once, later calls are ignored.
pub fn init_tracing() {
    // ---
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "habit_checkin=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}

/// Build the HTTP router over already-constructed dependencies.
pub fn build_router(app_state: AppState) -> Router {
    // ---
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/habit", get(list_habits).post(create_habit))
        .route("/habit/checkin", post(check_in))
        .route("/habit/{id}", get(get_habit).patch(update_habit))
        .route("/habit/{id}/checkins", get(list_checkins))
        .route("/streak/{habit_id}", get(get_streak))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            track_http_metrics,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Build the HTTP router with storage, sessions and metrics determined by
/// environment variables.
///
/// # Errors
/// Fails on missing or invalid configuration, or when Postgres cannot be
/// reached within the configured number of retries.
pub async fn create_router() -> Result<Router> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    let metrics = create_metrics(config.metrics)?;

    let repository = match &config.storage {
        StorageConfig::Postgres(db) => {
            let pool = init_database_with_retry(db).await?;
            create_postgres_repository(pool)
        }
        StorageConfig::Memory => infrastructure::memory::create(),
    };

    let sessions = create_redis_sessions(&config.redis.url)?;

    Ok(build_router(AppState::new(metrics, repository, sessions)))
}
