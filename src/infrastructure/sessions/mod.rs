mod redis_sessions;

pub use redis_sessions::RedisSessionStore;
use std::sync::Arc;

/// Creates a Redis-backed session store.
///
/// The client connects lazily, so an unreachable server is reported by the
/// first request (or `/health?mode=full`), not here.
pub fn create(redis_url: &str) -> anyhow::Result<crate::domain::SessionStorePtr> {
    // ---
    let client = redis::Client::open(redis_url)?;
    Ok(Arc::new(RedisSessionStore::new(client)))
}
