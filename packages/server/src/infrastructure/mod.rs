//! Infrastructure layer: the in-memory connection registry and the
//! stream-backed participant session.

pub mod registry;
pub mod session;

pub use registry::ConnectionRegistry;
pub use session::{ParticipantSession, PeerWriter};
