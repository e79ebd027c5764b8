//! Line-oriented TCP chat relay.
//!
//! The server accepts any number of TCP connections and rebroadcasts every
//! line a participant sends to all other connected participants.
//!
//! The crate is layered the same way as the rest of Linechat:
//! - `domain`: session ids, liveness, messages and the `Recipient` seam
//! - `infrastructure`: the connection registry and the TCP-backed session
//! - `usecase`: connecting, broadcasting to and disconnecting participants
//! - `ui`: the listener lifecycle and per-connection handling

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{LifecycleState, Server, run_server};
