//! Client error definitions.

use std::io;

use thiserror::Error;

/// Errors that end the client before or outside the chat loops
#[derive(Debug, Error)]
pub enum ClientError {
    /// The initial connection to the server failed.
    #[error("{addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
