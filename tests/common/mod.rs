// Test helpers are intentionally partially used
#![allow(dead_code)]

use habit_checkin::create_router;
use habit_checkin::domain::SessionStore;
use habit_checkin::RedisSessionStore;
use reqwest::Client;
use std::sync::Once;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;
use uuid::Uuid;

macro_rules! set_env_if_unset {
    // ---
    ($key:expr, $val:expr) => {
        if std::env::var($key).is_err() {
            std::env::set_var($key, $val);
        }
    };
}

static INIT: Once = Once::new();

// ============================================================================
// Test Setup
// ============================================================================

/// Initialize test environment variables once.
///
/// Habits are kept in memory unless `HABIT_STORAGE_TYPE` is already set, so
/// only the session-backed tests need a live Redis.
pub fn setup_test_env() {
    // ---
    INIT.call_once(|| {
        // ---
        set_env_if_unset!("HABIT_STORAGE_TYPE", "memory");
        set_env_if_unset!("HABIT_REDIS_URL", "redis://127.0.0.1:6379");
        set_env_if_unset!("HABIT_METRICS_TYPE", "noop");
        set_env_if_unset!("HABIT_DB_RETRY_COUNT", "3");
    });
}

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        // ---
        setup_test_env();

        let app = create_router()
            .await
            .expect("Should be able to create router");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }
}

/// Writes a session into the configured Redis the way the login service
/// would, returning the new user id and bearer token.
pub async fn login(username: &str) -> (Uuid, String) {
    // ---
    setup_test_env();

    let redis_url = std::env::var("HABIT_REDIS_URL").unwrap();
    let client = redis::Client::open(redis_url).expect("Invalid Redis URL");
    let store = RedisSessionStore::new(client);

    let user_id = Uuid::new_v4();
    let token = store
        .create_session(user_id, username)
        .await
        .expect("Failed to create session in Redis");

    (user_id, token)
}
