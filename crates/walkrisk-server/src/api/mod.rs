//! API routes for the walk-risk server.

pub mod request_id;
mod routes;

pub use routes::{RouteRequest, RouteSeverityResponse};

use crate::state::AppState;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

/// The full application: API routes, health check and tracing layers.
pub fn app(state: Arc<AppState>) -> Router {
    routes()
        .route("/health", get(|| async { "OK" }))
        .layer(middleware::from_fn(request_id::ensure_request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
