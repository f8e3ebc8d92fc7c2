//! Agent hook request and outcome types.

use serde::Serialize;

use crate::transform::{NormalizedNotification, Priority};

/// Source label attached to every forwarded notification.
pub const SOURCE_NAME: &str = "GitHub";

/// When the downstream agent should act on a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WakeMode {
    /// Wake immediately
    #[serde(rename = "now")]
    Now,
    /// Batch until the next heartbeat
    #[serde(rename = "next-heartbeat")]
    NextHeartbeat,
}

impl From<Priority> for WakeMode {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => WakeMode::Now,
            Priority::Normal | Priority::Low => WakeMode::NextHeartbeat,
        }
    }
}

/// JSON body POSTed to the agent hook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentHookRequest<'a> {
    pub message: &'a str,
    pub name: &'static str,
    pub session_key: &'a str,
    pub deliver: bool,
    pub wake_mode: WakeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<&'a str>,
}

impl<'a> AgentHookRequest<'a> {
    /// Build the request body for a notification with optional delivery overrides.
    pub fn new(
        notification: &'a NormalizedNotification,
        channel: Option<&'a str>,
        to: Option<&'a str>,
    ) -> Self {
        Self {
            message: &notification.message,
            name: SOURCE_NAME,
            session_key: &notification.session_key,
            deliver: true,
            wake_mode: notification.priority.into(),
            channel,
            to,
        }
    }
}

/// Outcome of a single forwarding attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForwardResult {
    /// Whether the agent hook answered 2xx
    pub success: bool,
    /// HTTP status, when a response was received
    pub status_code: Option<u16>,
    /// Diagnostic text for failures
    pub detail: Option<String>,
}

impl ForwardResult {
    pub fn delivered(status_code: u16) -> Self {
        Self {
            success: true,
            status_code: Some(status_code),
            detail: None,
        }
    }

    pub fn failed(status_code: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            detail: Some(detail.into()),
        }
    }
}
