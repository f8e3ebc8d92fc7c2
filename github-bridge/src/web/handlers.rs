//! Webhook endpoint handlers.
//!
//! The GitHub handler runs each delivery through, in order:
//! 1. Signature verification on the raw body
//! 2. JSON parsing
//! 3. Repository allow-list
//! 4. Event transformation
//! 5. A single forward to the agent hook
//!
//! Every path ends in an explicit status; nothing escapes as a panic or 5xx
//! from the framework.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::filter::RepoFilter;
use crate::forward::Forwarder;
use crate::transform::{transform, Payload};
use crate::web::signature::{is_signature_verification_enabled, verify_signature};
use crate::Config;

/// Header carrying the event name (`issues`, `push`, ...).
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the `sha256=` HMAC of the body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Header carrying GitHub's delivery GUID. Used for log correlation only.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub filter: Arc<RepoFilter>,
    pub forwarder: Forwarder,
}

impl AppState {
    pub fn new(config: Config, forwarder: Forwarder) -> Self {
        let filter = RepoFilter::new(config.repos_filter.as_deref());
        Self {
            config: Arc::new(config),
            filter: Arc::new(filter),
            forwarder,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// GitHub Webhook
// =============================================================================

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
}

impl WebhookResponse {
    fn reply(code: StatusCode, status: &'static str) -> (StatusCode, Json<WebhookResponse>) {
        (
            code,
            Json(WebhookResponse {
                status,
                session_key: None,
            }),
        )
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// GitHub webhook endpoint.
///
/// The body is taken as raw bytes so the signature is checked against exactly
/// what GitHub signed.
pub async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let event = header_str(&headers, EVENT_HEADER).unwrap_or("");
    let delivery = header_str(&headers, DELIVERY_HEADER).unwrap_or("");

    info!(
        event = %event,
        delivery = %delivery,
        body_length = body.len(),
        "github_webhook_received"
    );

    // Verify signature if a secret is configured
    if is_signature_verification_enabled(&state.config.webhook_secret) {
        let signature = header_str(&headers, SIGNATURE_HEADER);
        if !verify_signature(&body, signature, state.config.webhook_secret.as_deref()) {
            warn!(event = %event, delivery = %delivery, "github_signature_invalid");
            return WebhookResponse::reply(StatusCode::UNAUTHORIZED, "unauthorized");
        }
    }

    let data: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(event = %event, delivery = %delivery, error = %e, "github_invalid_json");
            return WebhookResponse::reply(StatusCode::BAD_REQUEST, "invalid_json");
        }
    };

    let payload = Payload::new(&data);
    let repo = payload.repo_full_name();

    if !state.filter.allows(repo) {
        info!(
            event = %event,
            delivery = %delivery,
            repo = repo.unwrap_or(""),
            "github_repo_filtered"
        );
        return WebhookResponse::reply(StatusCode::OK, "filtered");
    }

    let notification = match transform(event, &data) {
        Some(n) => n,
        None => {
            info!(
                event = %event,
                action = payload.action().unwrap_or(""),
                delivery = %delivery,
                "github_event_not_handled"
            );
            return WebhookResponse::reply(StatusCode::OK, "ignored");
        }
    };

    let result = state.forwarder.forward(&notification).await;

    if !result.success {
        error!(
            event = %event,
            delivery = %delivery,
            repo = payload.repo(),
            session_key = %notification.session_key,
            status = ?result.status_code,
            detail = result.detail.as_deref().unwrap_or(""),
            "github_forward_failed"
        );
        return WebhookResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, "forward_failed");
    }

    info!(
        event = %event,
        delivery = %delivery,
        session_key = %notification.session_key,
        priority = %notification.priority,
        "github_forwarded"
    );

    (
        StatusCode::OK,
        Json(WebhookResponse {
            status: "forwarded",
            session_key: Some(notification.session_key),
        }),
    )
}
