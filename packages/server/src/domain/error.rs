//! Domain layer error definitions.

use std::io;

use thiserror::Error;

use super::value_object::SessionId;

/// Errors related to the connection registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An insert reused an identifier that is still registered.
    ///
    /// Ids come from a monotonic counter, so this indicates an internal defect.
    #[error("Session {0} is already registered")]
    DuplicateId(SessionId),
}

/// Classified I/O failure on a single participant connection.
///
/// Every variant means the same thing to the relay: the peer is gone.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session's writer has already been released.
    #[error("connection is already closed")]
    Closed,

    /// Writing to the peer failed.
    #[error("failed to write to peer: {0}")]
    Write(#[source] io::Error),

    /// Reading from the peer failed.
    #[error("failed to read from peer: {0}")]
    Read(#[source] io::Error),

    /// The peer sent more than the given number of bytes without a newline.
    #[error("line exceeds {0} bytes")]
    LineTooLong(usize),
}
