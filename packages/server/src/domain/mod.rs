//! Domain layer for the chat relay.
//!
//! This module contains the relay's core types and the `Recipient` seam that
//! the broadcast logic depends on. It is independent of TCP and tokio I/O.

pub mod entity;
pub mod error;
pub mod factory;
pub mod recipient;
pub mod value_object;

pub use entity::{DisconnectReason, Message};
pub use error::{RegistryError, SessionError};
pub use factory::SessionIdFactory;
pub use recipient::{Delivery, Recipient};
pub use value_object::{Liveness, LivenessFlag, SessionId};

#[cfg(test)]
pub use recipient::MockRecipient;
