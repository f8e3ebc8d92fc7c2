//! Normalized notification produced by the event transformer.

use std::fmt;

use serde::Serialize;

/// Scheduling hint for the downstream consumer. Never used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

/// A GitHub event rendered for the agent hook.
///
/// `session_key` is derived from `(repo, entity kind, entity id)` so every
/// notification about the same issue, PR, release or push stream shares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedNotification {
    /// Human-readable message text
    pub message: String,
    /// Stable correlation key, e.g. `github:owner/repo:issue:42`
    pub session_key: String,
    /// Urgency hint
    pub priority: Priority,
}

impl NormalizedNotification {
    pub fn new(message: String, session_key: String, priority: Priority) -> Self {
        Self {
            message,
            session_key,
            priority,
        }
    }
}
