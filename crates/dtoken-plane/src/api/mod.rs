//! API module for the gateway server

pub mod error;
pub mod handlers;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use handlers::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check response
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub pending_sessions: u64,
    pub verification_mode: String,
}

/// Backend self-test response
#[derive(Serialize)]
pub struct TestResponse {
    pub message: String,
}

/// Health check endpoint
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Readiness check endpoint
///
/// GET /ready
pub async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    let pending_sessions = state.store.len().await.unwrap_or(0);

    Json(ReadyResponse {
        ready: true,
        pending_sessions,
        verification_mode: format!("{:?}", state.verification_mode).to_lowercase(),
    })
}

/// GET /api/test
pub async fn test_backend() -> Json<TestResponse> {
    Json(TestResponse {
        message: "Hello from the Backend!".into(),
    })
}

/// Create the API router
///
/// When `static_dir` is set, unmatched paths are served from it.
pub fn create_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    // CORS configuration for browser front ends
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/api/test", get(test_backend))
        // Digital token endpoints
        .route("/api/auth", post(handlers::authenticate))
        .route("/api/sign", post(handlers::sign))
        .route("/api/status/{session_id}", get(handlers::status));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
