use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Identity of the caller behind a valid session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    // ---
    pub user_id: Uuid,
    pub username: String,
}

/// Resolves bearer tokens to user identities.
///
/// Tokens are issued by the login service; this crate only validates them.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    // ---
    /// Issue a new session token for a user.
    async fn create_session(&self, user_id: Uuid, username: &str) -> Result<String>;

    /// Look up a token. `None` when unknown or expired.
    async fn validate_session(&self, token: &str) -> Result<Option<SessionInfo>>;

    /// Verify the backing store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Type alias for any backend that implements SessionStore.
pub type SessionStorePtr = Arc<dyn SessionStore>;
