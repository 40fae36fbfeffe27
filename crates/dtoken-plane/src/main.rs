//! Digital Token Gateway Binary
//!
//! Runs the gateway HTTP server in front of the remote signing authority.

use std::env;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dtoken_plane::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() {
    // Optional .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    let log_level = env::var("DTOKEN_LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Configuration
    let config = ServiceConfig::from_env().expect("Invalid configuration");

    info!(
        api_host = %config.authority.api_host,
        base_url = %config.authority.base_url,
        port = config.port,
        verification_mode = ?config.verification_mode,
        static_dir = ?config.static_dir,
        "Starting digital token gateway"
    );

    // Create application state
    let state = Arc::new(AppState::from_config(&config));

    // Build router
    let app = create_router(state, config.static_dir.as_deref());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
