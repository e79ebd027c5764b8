//! Broadcast recipient abstraction.
//!
//! The registry and the broadcast router only see sessions through this
//! trait. The TCP-backed implementation lives in the infrastructure layer.

use async_trait::async_trait;

use super::value_object::{Liveness, SessionId};

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    NotDelivered,
}

/// A live participant that can be sent lines and closed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Recipient: Send + Sync {
    /// Identifier the recipient is registered under
    fn id(&self) -> SessionId;

    /// Current liveness; dead recipients are never delivery targets
    fn liveness(&self) -> Liveness;

    /// Write one line to the peer.
    ///
    /// Failures are absorbed here: the recipient marks itself dead and the
    /// caller just sees `Delivery::NotDelivered`.
    async fn send(&self, line: &str) -> Delivery;

    /// Mark dead and release the connection. Calling it again is a no-op.
    async fn close(&self);
}
