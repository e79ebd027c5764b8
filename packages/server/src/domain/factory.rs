//! Domain factories for creating domain value objects.

use std::sync::atomic::{AtomicU64, Ordering};

use super::SessionId;

/// Factory for generating SessionId instances.
///
/// Identifiers are handed out from a monotonic counter owned by the server,
/// so an id is never reused even after its session has been removed.
#[derive(Debug, Default)]
pub struct SessionIdFactory {
    next: AtomicU64,
}

impl SessionIdFactory {
    /// Create a factory whose first id is `0`.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a factory whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Generate the next SessionId.
    pub fn generate(&self) -> SessionId {
        SessionId::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
