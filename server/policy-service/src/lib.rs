//! Outage Safety Policy Service
//!
//! HTTP wrapper that evaluates outage snapshots in-process with policy-engine.
//! Stateless; bind to 127.0.0.1 by default (internal only).

mod handlers;
mod state;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::{evaluate, health, rules};
pub use state::AppState;

/// Build the router with CORS and request tracing attached.
pub fn create_app(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/rules", get(rules))
    .route("/evaluate", post(evaluate))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
