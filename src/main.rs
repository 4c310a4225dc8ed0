use anyhow::Result;
use habit_checkin::{create_router, init_tracing, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    // .env is optional; real deployments set the environment directly.
    dotenvy::dotenv().ok();
    init_tracing();

    let app = create_router().await?;

    let endpoint = ServerConfig::from_env().bind_addr;

    info!("Starting at endpoint:{}", endpoint);
    info!("Starting Habit Check-in API server v{}...", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&endpoint).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // ---
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
