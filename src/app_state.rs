//! Application state management.
//!
//! Defines the shared state handed to every Axum handler through the
//! `State` extractor: the habit repository, the session store used to
//! authenticate callers, and the metrics implementation. Everything is held
//! behind `Arc`, so cloning the state per request is cheap.

use crate::domain::{HabitRepository, Metrics, MetricsPtr, RepositoryPtr, SessionStore, SessionStorePtr};

/// Shared application state passed to all Axum handlers.
///
/// This struct is the dependency injection container of the service.
/// Handlers depend on the `HabitRepository` and `SessionStore` traits, not
/// on Postgres or Redis, which is what lets the router run against the
/// in-memory implementations in tests.
///
/// Built once at startup, attached with `.with_state(app_state)`, never
/// mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Metrics implementation for recording application events.
    metrics: MetricsPtr,

    /// Persistent storage for habits, check-ins and snapshots.
    repository: RepositoryPtr,

    /// Resolves bearer tokens to users.
    sessions: SessionStorePtr,
}

impl AppState {
    // ---

    pub fn new(metrics: MetricsPtr, repository: RepositoryPtr, sessions: SessionStorePtr) -> Self {
        // ---
        AppState {
            metrics,
            repository,
            sessions,
        }
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &dyn Metrics {
        // ---
        self.metrics.as_ref()
    }

    /// Get a reference to the repository implementation.
    pub(crate) fn repository(&self) -> &dyn HabitRepository {
        // ---
        self.repository.as_ref()
    }

    /// Get a reference to the session store.
    pub(crate) fn sessions(&self) -> &dyn SessionStore {
        // ---
        self.sessions.as_ref()
    }
}

#[cfg(test)]
mod tests {
    // ---

    use super::*;
    use crate::infrastructure::{create_noop_metrics, MemoryRepository, MemorySessionStore};
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_app_state_clone_shares_stores() {
        // ---
        let state = AppState::new(
            create_noop_metrics().unwrap(),
            Arc::new(MemoryRepository::new()),
            Arc::new(MemorySessionStore::new()),
        );
        let cloned = state.clone();

        let token = state
            .sessions()
            .create_session(Uuid::new_v4(), "frodo")
            .await
            .unwrap();

        // The clone sees the session created through the original.
        let info = cloned.sessions().validate_session(&token).await.unwrap();
        assert_eq!(info.map(|i| i.username).as_deref(), Some("frodo"));

        assert!(cloned.repository().ping().await.is_ok());
        assert_eq!(cloned.metrics().render(), "");
    }
}
