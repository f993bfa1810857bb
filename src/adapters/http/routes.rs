//! Route table for the HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::AppContext;

use super::handlers;

/// Builds the application router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    let request_timeout = Duration::from_secs(ctx.config.server.request_timeout_secs);

    Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/api/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(ctx)
}
