//! Core domain models for the chat relay.

use std::fmt;

use super::value_object::SessionId;

/// One line of chat text together with the session that sent it.
///
/// Exists only for the duration of a single broadcast; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Session the line was read from
    pub sender: SessionId,
    /// Line content without its terminator, relayed verbatim
    pub text: String,
}

impl Message {
    pub fn new(sender: SessionId, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

/// Why a participant session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The peer closed its side of the connection.
    EndOfStream,
    /// Reading from the peer failed (reset, timeout, ...).
    ReadFailed,
    /// The peer sent a line longer than the relay accepts.
    LineTooLong,
    /// The session was closed locally: a failed write or server shutdown.
    Closed,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::EndOfStream => "peer closed the connection",
            Self::ReadFailed => "read failed",
            Self::LineTooLong => "line too long",
            Self::Closed => "closed by server",
        };
        f.write_str(reason)
    }
}
