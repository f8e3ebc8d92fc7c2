//! Web server module for handling inbound GitHub webhooks.
//!
//! Routes:
//! - `GET /health` liveness probe
//! - `POST /webhooks/github` verify, filter, transform and forward a delivery

pub mod handlers;
pub mod signature;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{github_webhook, health, AppState, HealthResponse, WebhookResponse};
pub use signature::{is_signature_verification_enabled, verify_signature};

/// Build the application router.
///
/// The body limit replaces axum's 2 MiB default so large pushes still reach
/// the handler.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhooks/github", post(github_webhook))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
