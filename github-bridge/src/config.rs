//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at startup and shared read-only afterwards.
//! Nothing downstream of `Config::from_env` touches the environment.

use std::env;

use tracing::warn;
use url::Url;

/// Default body limit, matching GitHub's 25 MB delivery cap.
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret GitHub signs deliveries with. `None` disables verification.
    pub webhook_secret: Option<String>,

    /// Repositories (`owner/name`) allowed through. `None` disables the filter.
    pub repos_filter: Option<Vec<String>>,

    /// Outbound HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Largest accepted webhook body. GitHub caps deliveries at 25 MB.
    pub max_body_bytes: usize,

    /// Where normalized notifications are relayed to
    pub downstream: DownstreamConfig,
}

/// Downstream agent hook settings.
///
/// `url` and `token` are both required to forward; their absence is reported
/// per delivery rather than at startup.
#[derive(Debug, Clone, Default)]
pub struct DownstreamConfig {
    /// Agent hook endpoint
    pub url: Option<Url>,

    /// Bearer token sent with every forwarded notification
    pub token: Option<String>,

    /// Default delivery channel override
    pub channel: Option<String>,

    /// Default delivery recipient override
    pub to: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            webhook_secret: parse_optional("GITHUB_WEBHOOK_SECRET"),

            repos_filter: parse_csv("REPOS_FILTER"),

            request_timeout_ms: parse_u64("REQUEST_TIMEOUT_MS", 10_000),

            max_body_bytes: parse_u64("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES as u64) as usize,

            downstream: DownstreamConfig {
                url: parse_url("AGENT_HOOK_URL"),
                token: parse_optional("AGENT_HOOK_TOKEN"),
                channel: parse_optional("DELIVER_TO_CHANNEL"),
                to: parse_optional("DELIVER_TO"),
            },
        }
    }
}

/// Read an optional string, treating blank values as unset.
fn parse_optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_u64(name: &str, default: u64) -> u64 {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid integer value, using default");
            default
        }
    }
}

/// Parse an absolute URL. Malformed values are logged and treated as unset.
fn parse_url(name: &str) -> Option<Url> {
    let raw = parse_optional(name)?;
    match Url::parse(&raw) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(env_var = name, error = %e, "Invalid URL, ignoring");
            None
        }
    }
}

/// Parse a comma-separated list of strings.
///
/// A variable that yields no entries at all is treated as unset.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name)
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|items| !items.is_empty())
}
