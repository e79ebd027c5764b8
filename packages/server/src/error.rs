//! Server error definitions.

use std::io;

use thiserror::Error;

/// Errors that abort the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound; the server never accepts.
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
