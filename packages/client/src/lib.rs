//! CLI chat client for Linechat.
//!
//! Connects once to a relay server, then runs two loops over the same
//! connection: one sends typed lines prefixed with the display name, the
//! other prints whatever the server relays.

pub mod config;
pub mod console;
pub mod error;
pub mod session;

// Re-export entry points
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{ExitReason, run_client, run_session};
