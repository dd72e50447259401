//! HTTP surface for the session recorder.
//!
//! Endpoints:
//!   POST /submit                (per-item attempt telemetry)
//!   POST /complete              (end-of-play marker)
//!   POST /api/session/complete  (persist a finished session)
//!   GET  /api/stats             (streaks and lifetime totals)
//!   GET  /api/daily             (freshly sampled study plan)
//!   GET  /health

#![forbid(unsafe_code)]

pub mod error;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tracing::info;

pub use error::ApiError;
pub use state::AppContext;

#[must_use]
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/submit", post(routes::attempts::submit))
        .route("/complete", post(routes::attempts::complete))
        .route("/api/session/complete", post(routes::sessions::session_complete))
        .route("/api/stats", get(routes::sessions::stats))
        .route("/api/daily", get(routes::daily::daily))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

/// Bind and serve until the process is stopped.
///
/// # Errors
///
/// Returns the underlying I/O error if binding or serving fails.
pub async fn serve(ctx: Arc<AppContext>, addr: SocketAddr) -> std::io::Result<()> {
    let router = build_router(ctx);
    info!("recorder listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}
