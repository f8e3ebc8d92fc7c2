//! Async agent hook client.
//!
//! The forwarder is cheap to clone and shared across requests. It holds only
//! the HTTP client and read-only downstream settings.

use std::sync::Arc;

use reqwest::Client;
use tracing::{error, info};

use super::types::{AgentHookRequest, ForwardResult};
use crate::config::DownstreamConfig;
use crate::transform::NormalizedNotification;

/// Reasons a forwarding attempt did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("agent hook url or token not configured")]
    MissingConfig,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("agent hook returned {status}: {body}")]
    BadStatus { status: u16, body: String },
}

impl ForwardError {
    /// HTTP status of the downstream response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ForwardError::BadStatus { status, .. } => Some(*status),
            ForwardError::Request(e) => e.status().map(|s| s.as_u16()),
            ForwardError::MissingConfig => None,
        }
    }
}

/// Relays notifications to the configured agent hook.
#[derive(Clone)]
pub struct Forwarder {
    client: Client,
    downstream: Arc<DownstreamConfig>,
}

impl Forwarder {
    /// Create a forwarder using a shared HTTP client.
    pub fn new(client: Client, downstream: DownstreamConfig) -> Self {
        Self {
            client,
            downstream: Arc::new(downstream),
        }
    }

    /// Forward one notification. Never fails: every outcome is a `ForwardResult`.
    pub async fn forward(&self, notification: &NormalizedNotification) -> ForwardResult {
        match self.send(notification).await {
            Ok(status) => {
                info!(
                    session_key = %notification.session_key,
                    status = status,
                    "forward_succeeded"
                );
                ForwardResult::delivered(status)
            }
            Err(e) => {
                match &e {
                    ForwardError::MissingConfig => {
                        error!(
                            has_url = self.downstream.url.is_some(),
                            has_token = self.downstream.token.is_some(),
                            "forward_missing_config"
                        );
                    }
                    ForwardError::Request(err) if err.is_timeout() => {
                        error!(
                            session_key = %notification.session_key,
                            error = %err,
                            "forward_timeout"
                        );
                    }
                    ForwardError::Request(err) => {
                        error!(
                            session_key = %notification.session_key,
                            error = %err,
                            "forward_request_error"
                        );
                    }
                    ForwardError::BadStatus { status, body } => {
                        error!(
                            session_key = %notification.session_key,
                            status = status,
                            body = %body,
                            "forward_bad_status"
                        );
                    }
                }
                ForwardResult::failed(e.status(), e.to_string())
            }
        }
    }

    /// Issue the POST and return the 2xx status on success.
    async fn send(&self, notification: &NormalizedNotification) -> Result<u16, ForwardError> {
        let (url, token) = match (&self.downstream.url, &self.downstream.token) {
            (Some(url), Some(token)) => (url.clone(), token),
            _ => return Err(ForwardError::MissingConfig),
        };

        let body = AgentHookRequest::new(
            notification,
            self.downstream.channel.as_deref(),
            self.downstream.to.as_deref(),
        );

        let resp = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ForwardError::BadStatus { status, body });
        }

        Ok(status)
    }
}
