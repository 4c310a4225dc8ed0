mod database;
pub mod memory;
pub mod metrics;
mod sessions;

// Re-export the factory functions for easy access
pub use database::{create_postgres_repository, init_database_with_retry, PostgresRepository};
pub use memory::{MemoryRepository, MemorySessionStore};
pub use metrics::{create_metrics, create_noop_metrics, create_prom_metrics};
pub use sessions::{create as create_redis_sessions, RedisSessionStore};
