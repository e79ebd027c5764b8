//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Binds the listening socket (a bind failure aborts startup).
//! - Accepts new TCP connections until the shutdown token is cancelled.
//! - Spawns one task per connection; tasks are never pooled or reused.
//! - Drains the remaining sessions once accepting stops.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::{net::TcpListener, sync::watch, task::JoinSet};
use tokio_util::sync::CancellationToken;

use crate::{config::ServerConfig, error::ServerError, infrastructure::ConnectionRegistry};

use super::{
    handler::handle_connection,
    signal::shutdown_signal,
    state::{AppState, LifecycleState},
};

/// Pause after a failed accept so a persistent failure does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A bound relay server, ready to accept.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: ServerConfig,
    state: Arc<AppState>,
    lifecycle: watch::Sender<LifecycleState>,
}

impl Server {
    /// Bind the listening socket.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address cannot be bound, e.g. the
    /// port is already in use.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr = config.socket_addr_string();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Server started on {}, waiting for clients!", local_addr);

        let (lifecycle, _) = watch::channel(LifecycleState::Listening);

        Ok(Self {
            listener,
            local_addr,
            config,
            state: Arc::new(AppState::new(ConnectionRegistry::new())),
            lifecycle,
        })
    }

    /// Address actually bound (useful when the configured port is `0`).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle to the live session registry.
    pub fn registry(&self) -> ConnectionRegistry {
        self.state.registry.clone()
    }

    /// Watch the server move through its lifecycle states.
    pub fn subscribe_lifecycle(&self) -> watch::Receiver<LifecycleState> {
        self.lifecycle.subscribe()
    }

    /// Accept connections until `shutdown` is cancelled, then drain.
    ///
    /// Failing to accept a single connection is logged and does not stop the
    /// loop; failures inside a session never reach this function.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), ServerError> {
        let Self {
            listener,
            local_addr,
            config,
            state,
            lifecycle,
        } = self;
        let mut sessions = JoinSet::new();

        lifecycle.send_replace(LifecycleState::Accepting);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        sessions.spawn(handle_connection(stream, peer, state.clone()));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
                // reap finished session tasks as we go
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!("Session task failed: {}", e);
                    }
                }
            }
        }

        // Stop accepting: the listening socket closes here.
        drop(listener);
        lifecycle.send_replace(LifecycleState::Draining);
        tracing::info!(
            "Stopped listening on {}, draining {} session(s)",
            local_addr,
            state.registry.len().await
        );

        drain(&config, &state, &mut sessions).await;

        lifecycle.send_replace(LifecycleState::Stopped);
        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Let in-flight sessions finish, closing whatever is left after the grace
/// period (or immediately when configured to).
async fn drain(config: &ServerConfig, state: &AppState, sessions: &mut JoinSet<()>) {
    if config.close_sessions_on_shutdown {
        let closed = state.disconnect.execute_all().await;
        tracing::info!("Closed {} session(s)", closed);
    }

    let finished = tokio::time::timeout(config.shutdown_grace, async {
        while sessions.join_next().await.is_some() {}
    })
    .await;

    if finished.is_err() {
        // abort first so no broadcast is still in flight while closing
        sessions.shutdown().await;
        let closed = state.disconnect.execute_all().await;
        tracing::warn!(
            "Grace period of {:?} exceeded, closed {} remaining session(s)",
            config.shutdown_grace,
            closed
        );
    }
}

/// Bind, serve until Ctrl-C / SIGTERM, then drain and stop.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let server = Server::bind(config).await?;

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received.");
        trigger.cancel();
    });

    server.run(shutdown).await
}
