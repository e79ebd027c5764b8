//! Per-connection handler.

use std::{net::SocketAddr, sync::Arc};

use linechat_shared::time::{format_elapsed, get_jst_timestamp, timestamp_to_jst_rfc3339};
use tokio::net::TcpStream;

use crate::domain::Recipient;

use super::state::AppState;

/// Drive one accepted connection from registration to teardown.
///
/// Runs on its own task. Nothing here is propagated to the accept loop:
/// every failure ends only this session.
pub(super) async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    let (reader, writer) = stream.into_split();

    let session = match state.connect.execute(Some(peer), Box::new(writer)).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Rejecting connection from {}: {}", peer, e);
            return;
        }
    };
    let id = session.id();
    tracing::info!(
        "New connection, ip is: {}, port: {}. Added to the list of sessions as {}",
        peer.ip(),
        peer.port(),
        id
    );

    let router = &state.router;
    let reason = session
        .read_loop(reader, |message| async move {
            router.broadcast(&message).await;
        })
        .await;

    state.disconnect.execute(id).await;
    tracing::info!(
        "Session {} from {} disconnected ({}); connected since {} ({}), {} session(s) remaining",
        id,
        peer,
        reason,
        timestamp_to_jst_rfc3339(session.connected_at()),
        format_elapsed(session.connected_at(), get_jst_timestamp()),
        state.disconnect.count_remaining_participants().await
    );
}
