mod memory_repository;
mod memory_sessions;

pub use memory_repository::MemoryRepository;
pub use memory_sessions::MemorySessionStore;
use std::sync::Arc;

/// Creates an empty in-memory habit repository.
pub fn create() -> crate::domain::RepositoryPtr {
    tracing::info!("Using in-memory habit storage; data is lost on restart");
    Arc::new(MemoryRepository::new())
}
