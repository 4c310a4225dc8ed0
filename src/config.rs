// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. A missing or malformed required
//! value stops the process before it binds a socket.

use anyhow::Result;
use std::time::Duration;

// ============================================================
// Env helpers
// ============================================================

/// Reads a required environment variable.
///
/// Fails fast with a human-readable message naming the variable.
/// Missing configuration is a deployment error, not a runtime condition.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads and parses an optional environment variable, falling back to
/// `$default` when it is unset or unparsable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// AppConfig
// ============================================================

/// Startup configuration of the habit service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: server::ServerConfig,
    pub storage: storage::StorageConfig,
    pub redis: redis::RedisConfig,
    pub metrics: MetricsKind,
}

impl AppConfig {
    /// Reads every section from the environment.
    ///
    /// # Errors
    /// Fails on the first missing or invalid setting.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            server: server::ServerConfig::from_env(),
            storage: storage::StorageConfig::from_env()?,
            redis: redis::RedisConfig::from_env()?,
            metrics: MetricsKind::from_env()?,
        })
    }
}

/// Which metrics backend to install (`HABIT_METRICS_TYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsKind {
    // ---
    Noop,
    Prometheus,
}

impl MetricsKind {
    // ---
    fn from_env() -> Result<Self> {
        // ---
        match std::env::var("HABIT_METRICS_TYPE").as_deref() {
            Err(_) | Ok("noop") => Ok(MetricsKind::Noop),
            Ok("prom") => Ok(MetricsKind::Prometheus),
            Ok(other) => Err(anyhow::anyhow!(
                "Invalid HABIT_METRICS_TYPE: {other} (expected noop or prom)"
            )),
        }
    }
}

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---

    /// HTTP listener configuration.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Socket address to bind. Defaults to `127.0.0.1:8080`.
        pub bind_addr: String,
    }

    impl ServerConfig {
        // ---
        pub fn from_env() -> Self {
            // ---
            let bind_addr = std::env::var("HABIT_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string());

            Self { bind_addr }
        }
    }
}
pub use server::ServerConfig;

// ============================================================
// Storage configuration
// ============================================================

mod storage {
    // ---
    use super::*;

    /// Where habits and check-ins are persisted (`HABIT_STORAGE_TYPE`).
    #[derive(Debug, Clone)]
    pub enum StorageConfig {
        // ---
        /// PostgreSQL, the default.
        Postgres(DatabaseConfig),

        /// Process memory. Nothing survives a restart.
        Memory,
    }

    impl StorageConfig {
        /// Builds a [`StorageConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error for an unknown storage type, or when Postgres is
        /// selected and its configuration is incomplete.
        pub fn from_env() -> Result<Self> {
            // ---
            match std::env::var("HABIT_STORAGE_TYPE").as_deref() {
                Err(_) | Ok("postgres") => Ok(Self::Postgres(DatabaseConfig::from_env()?)),
                Ok("memory") => Ok(Self::Memory),
                Ok(other) => Err(anyhow::anyhow!(
                    "Invalid HABIT_STORAGE_TYPE: {other} (expected postgres or memory)"
                )),
            }
        }
    }

    /// Postgres connection and pool settings.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// PostgreSQL connection string.
        pub database_url: String,

        /// Number of connection attempts at startup. Defaults to 50.
        pub retry_count: u32,

        /// How long a query waits for a pooled connection. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Idle connections kept open. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections open concurrently. Defaults to 15.
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `DATABASE_URL` is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("HABIT_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs = optional_env_parse!("HABIT_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("HABIT_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("HABIT_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }
}
pub use storage::{DatabaseConfig, StorageConfig};

// ============================================================
// Redis configuration
// ============================================================

mod redis {
    // ---
    use super::*;

    /// Redis holds the session tokens issued by the login service.
    #[derive(Debug, Clone)]
    pub struct RedisConfig {
        /// e.g. `redis://127.0.0.1:6379`.
        pub url: String,
    }

    impl RedisConfig {
        /// Builds a [`RedisConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `HABIT_REDIS_URL` is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let url = required_env!("HABIT_REDIS_URL");

            Ok(Self { url })
        }
    }
}
pub use redis::RedisConfig;

// ============================================================
// Tests
// ============================================================
