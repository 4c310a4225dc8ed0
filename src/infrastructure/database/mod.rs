mod postgres_repository;

#[cfg(test)]
mod tests;

pub use postgres_repository::{create_postgres_repository, PostgresRepository};

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Delay between connection attempts at startup.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Connects to Postgres, retrying while the server comes up, then applies
/// the embedded migrations.
///
/// # Errors
/// Returns the last connection error once `retry_count` attempts have
/// failed, or any migration error.
pub async fn init_database_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let attempts = config.retry_count.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        // ---
        let connect = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await;

        match connect {
            Ok(pool) => {
                tracing::info!("Connected to database on attempt {}", attempt);
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("failed to run database migrations")?;
                return Ok(pool);
            }
            Err(e) => {
                tracing::warn!("Database connection attempt {}/{} failed: {}", attempt, attempts, e);
                last_err = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    Err(match last_err {
        Some(e) => anyhow::Error::new(e).context("could not connect to database"),
        None => anyhow::anyhow!("could not connect to database"),
    })
}
