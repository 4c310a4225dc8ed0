//! Session storage in Redis.
//!
//! Sessions live under `session:{token}` as JSON with a Redis TTL. The
//! login service writes them; this service reads them to authenticate
//! habit requests.

use crate::domain::{SessionInfo, SessionStore};
use anyhow::Result;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---

/// Session data stored in Redis.
#[derive(Debug, Serialize, Deserialize)]
struct SessionData {
    //
    user_id: String,
    username: String,
    expires_at: i64,
}

// ---

/// Session token time-to-live in seconds (7 days).
const SESSION_TTL_SECONDS: i64 = 604_800;

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

// ---

pub struct RedisSessionStore {
    // ---
    client: Client,
}

impl RedisSessionStore {
    // ---
    pub fn new(client: Client) -> Self {
        // ---
        Self { client }
    }

    async fn conn(&self) -> Result<MultiplexedConnection> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| {
                tracing::error!("Failed to connect to Redis: {:?}", err);
                err.into()
            })
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    // ---
    async fn create_session(&self, user_id: Uuid, username: &str) -> Result<String> {
        //
        let token = Uuid::new_v4().to_string();
        let expires_at = chrono::Utc::now().timestamp() + SESSION_TTL_SECONDS;

        let session_data = SessionData {
            //
            user_id: user_id.to_string(),
            username: username.to_string(),
            expires_at,
        };

        let session_json = serde_json::to_string(&session_data)?;

        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(session_key(&token), session_json, SESSION_TTL_SECONDS as u64)
            .await?;

        tracing::info!("Created session for user: {}", username);

        Ok(token)
    }

    async fn validate_session(&self, token: &str) -> Result<Option<SessionInfo>> {
        //
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.get(session_key(token)).await?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let data: SessionData = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Discarding malformed session payload: {}", e);
                return Ok(None);
            }
        };

        if data.expires_at <= chrono::Utc::now().timestamp() {
            tracing::debug!("Session for {} has expired", data.username);
            return Ok(None);
        }

        let Ok(user_id) = Uuid::parse_str(&data.user_id) else {
            tracing::warn!("Session carries invalid user id: {}", data.user_id);
            return Ok(None);
        };

        Ok(Some(SessionInfo {
            user_id,
            username: data.username,
        }))
    }

    async fn ping(&self) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;
        let _: String = conn.ping().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_keys_are_namespaced() {
        assert_eq!(session_key("abc"), "session:abc");
    }

    #[tokio::test]
    async fn unreachable_redis_is_an_error() {
        // ---
        let client = Client::open("redis://invalid-host:6379").unwrap();
        let store = RedisSessionStore::new(client);

        assert!(store.validate_session("token").await.is_err());
        assert!(store.ping().await.is_err());
    }
}
