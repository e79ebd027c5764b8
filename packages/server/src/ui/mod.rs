//! TCP chat relay server: listener lifecycle and per-connection handling.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{Server, run_server};
pub use signal::shutdown_signal;
pub use state::{AppState, LifecycleState};
