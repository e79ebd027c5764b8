//! Stream-backed participant session.
//!
//! A `ParticipantSession` owns the write half of one accepted connection.
//! Its read half is consumed by `read_loop`, which runs on the connection's
//! own task and is the only reader of the socket. Writes come from any
//! broadcast and are serialized through the writer mutex so that lines from
//! concurrent senders never interleave. A write in progress gives up as soon
//! as the session is closed, so `close` never waits on a peer that stopped
//! reading.

use std::{future::Future, net::SocketAddr};

use async_trait::async_trait;
use linechat_shared::{
    protocol::{MAX_LINE_BYTES, decode_line},
    time::get_jst_timestamp,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    sync::Mutex,
};
use tokio_util::sync::CancellationToken;

use crate::domain::{
    Delivery, DisconnectReason, Liveness, LivenessFlag, Message, Recipient, SessionError, SessionId,
};

/// Write half of a participant connection.
pub type PeerWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// One connected participant on the server side.
pub struct ParticipantSession {
    id: SessionId,
    peer_addr: Option<SocketAddr>,
    /// Unix timestamp when accepted (in JST, milliseconds)
    connected_at: i64,
    liveness: LivenessFlag,
    /// `None` once the connection has been released
    writer: Mutex<Option<PeerWriter>>,
    /// Cancelled when the session is closed locally; stops `read_loop`
    closed: CancellationToken,
}

impl ParticipantSession {
    pub fn new(id: SessionId, peer_addr: Option<SocketAddr>, writer: PeerWriter) -> Self {
        Self {
            id,
            peer_addr,
            connected_at: get_jst_timestamp(),
            liveness: LivenessFlag::new(),
            writer: Mutex::new(Some(writer)),
            closed: CancellationToken::new(),
        }
    }

    pub fn connected_at(&self) -> i64 {
        self.connected_at
    }

    pub fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Read lines from the peer until it goes away or the session is closed.
    ///
    /// Every line (terminator stripped) is handed to `on_message` tagged with
    /// this session's id; the next line is not read until `on_message`
    /// completes, which keeps this sender's messages in order. A line longer
    /// than `MAX_LINE_BYTES` ends the session. On exit the
    /// session is marked dead. Removing it from the registry and releasing
    /// the writer is the caller's job.
    pub async fn read_loop<R, F, Fut>(&self, reader: R, mut on_message: F) -> DisconnectReason
    where
        R: AsyncRead + Unpin,
        F: FnMut(Message) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        let reason = loop {
            buf.clear();
            let mut limited = (&mut reader).take(MAX_LINE_BYTES as u64);
            let read = tokio::select! {
                biased;
                _ = self.closed.cancelled() => break DisconnectReason::Closed,
                read = limited.read_until(b'\n', &mut buf) => read,
            };

            match read {
                Ok(0) => break DisconnectReason::EndOfStream,
                Ok(n) if n == MAX_LINE_BYTES && buf.last() != Some(&b'\n') => {
                    tracing::warn!(
                        "Session {} ({}): {}",
                        self.id,
                        self.peer_label(),
                        SessionError::LineTooLong(MAX_LINE_BYTES)
                    );
                    break DisconnectReason::LineTooLong;
                }
                Ok(_) => {
                    let text = decode_line(&buf);
                    tracing::debug!("Session {} received: {}", self.id, text);
                    on_message(Message::new(self.id, text)).await;
                }
                Err(e) => {
                    tracing::warn!(
                        "Session {} ({}): {}",
                        self.id,
                        self.peer_label(),
                        SessionError::Read(e)
                    );
                    break DisconnectReason::ReadFailed;
                }
            }
        };

        self.liveness.mark_dead();
        reason
    }

    fn peer_label(&self) -> String {
        self.peer_addr
            .map_or_else(|| "unknown peer".to_string(), |addr| addr.to_string())
    }

    async fn write_line(&self, line: &str) -> Result<(), SessionError> {
        let mut guard = tokio::select! {
            biased;
            _ = self.closed.cancelled() => return Err(SessionError::Closed),
            guard = self.writer.lock() => guard,
        };
        let writer = guard.as_mut().ok_or(SessionError::Closed)?;

        let mut frame = Vec::with_capacity(line.len() + 1);
        frame.extend_from_slice(line.as_bytes());
        frame.push(b'\n');

        let result = tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(SessionError::Closed),
            written = async {
                writer.write_all(&frame).await?;
                writer.flush().await
            } => written.map_err(SessionError::Write),
        };
        if result.is_err() {
            // the connection is unusable (or half-written); release it so no
            // later send retries and `close` finds the lock free
            guard.take();
        }
        result
    }
}

#[async_trait]
impl Recipient for ParticipantSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn liveness(&self) -> Liveness {
        self.liveness.get()
    }

    async fn send(&self, line: &str) -> Delivery {
        if !self.liveness.is_alive() {
            return Delivery::NotDelivered;
        }

        match self.write_line(line).await {
            Ok(()) => Delivery::Delivered,
            Err(SessionError::Closed) => {
                tracing::debug!("Session {}: send skipped, session closed", self.id);
                self.liveness.mark_dead();
                self.closed.cancel();
                Delivery::NotDelivered
            }
            Err(e) => {
                tracing::warn!("Session {} ({}): {}", self.id, self.peer_label(), e);
                self.liveness.mark_dead();
                self.closed.cancel();
                Delivery::NotDelivered
            }
        }
    }

    async fn close(&self) {
        self.liveness.mark_dead();
        self.closed.cancel();

        let writer = self.writer.lock().await.take();
        if let Some(mut writer) = writer
            && let Err(e) = writer.shutdown().await
        {
            tracing::debug!("Session {}: shutdown after close failed: {}", self.id, e);
        }
    }
}
