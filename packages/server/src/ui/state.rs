//! Server state shared with every connection task.

use std::fmt;

use crate::{
    domain::SessionIdFactory,
    infrastructure::ConnectionRegistry,
    usecase::{BroadcastRouter, ConnectParticipantUseCase, DisconnectParticipantUseCase},
};

/// Shared application state
pub struct AppState {
    /// Registry of live sessions (shared by all use cases below)
    pub registry: ConnectionRegistry,
    pub connect: ConnectParticipantUseCase,
    pub router: BroadcastRouter,
    pub disconnect: DisconnectParticipantUseCase,
}

impl AppState {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self {
            connect: ConnectParticipantUseCase::new(registry.clone(), SessionIdFactory::new()),
            router: BroadcastRouter::new(registry.clone()),
            disconnect: DisconnectParticipantUseCase::new(registry.clone()),
            registry,
        }
    }
}

/// Where the server is in its lifecycle.
///
/// `Listening → Accepting → Draining → Stopped`. A server that failed to
/// bind never leaves `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Listening,
    Accepting,
    Draining,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            Self::Stopped => "stopped",
            Self::Listening => "listening",
            Self::Accepting => "accepting",
            Self::Draining => "draining",
        };
        f.write_str(state)
    }
}
