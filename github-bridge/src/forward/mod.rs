//! Forwarding of normalized notifications to the agent hook.
//!
//! ## Flow
//!
//! ```text
//! NormalizedNotification → AgentHookRequest → POST (bearer auth) → ForwardResult
//! ```
//!
//! Each notification is sent exactly once. Retrying is left to GitHub, which
//! redelivers when the webhook answers with an error status.

pub mod forwarder;
pub mod types;

pub use forwarder::{ForwardError, Forwarder};
pub use types::{AgentHookRequest, ForwardResult, WakeMode, SOURCE_NAME};
