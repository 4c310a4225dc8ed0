use crate::domain::{SessionInfo, SessionStore};
use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session store kept in process memory. Sessions never expire.
#[derive(Default)]
pub struct MemorySessionStore {
    // ---
    sessions: RwLock<HashMap<String, SessionInfo>>,
}

impl MemorySessionStore {
    // ---
    pub fn new() -> Self {
        // ---
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    // ---
    async fn create_session(&self, user_id: Uuid, username: &str) -> Result<String> {
        // ---
        let token = Uuid::new_v4().to_string();
        let info = SessionInfo {
            user_id,
            username: username.to_string(),
        };

        self.sessions.write().await.insert(token.clone(), info);
        Ok(token)
    }

    async fn validate_session(&self, token: &str) -> Result<Option<SessionInfo>> {
        // ---
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_token_resolves_to_user() {
        // ---
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();

        let token = store.create_session(user_id, "bilbo").await.unwrap();
        let info = store.validate_session(&token).await.unwrap().unwrap();

        assert_eq!(info.user_id, user_id);
        assert_eq!(info.username, "bilbo");
        assert!(store.validate_session("nope").await.unwrap().is_none());
    }
}
