//! GitHub bridge - relays GitHub webhooks to an agent hook endpoint.
//!
//! Each delivery is handled independently; the only shared state is the
//! read-only configuration loaded at startup.
//!
//! ## Architecture
//!
//! ```text
//! GitHub → /webhooks/github → verify → parse → filter → transform → forward → agent hook
//! ```

pub mod config;
pub mod filter;
pub mod forward;
pub mod transform;
pub mod web;

// Re-export commonly used types
pub use config::{Config, DownstreamConfig};
pub use filter::RepoFilter;
pub use forward::{ForwardResult, Forwarder};
pub use transform::{transform, NormalizedNotification, Priority};
pub use web::AppState;
