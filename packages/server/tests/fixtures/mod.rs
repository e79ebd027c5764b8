//! Test fixtures: an in-process relay server and raw line clients.

#![allow(dead_code)]

use std::{future::Future, net::SocketAddr, time::Duration};

use linechat_server::{
    LifecycleState, Server, ServerConfig, ServerError, infrastructure::ConnectionRegistry,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::watch,
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// How long any single wait in a test may take before it fails.
pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// How long a client must stay silent to count as "received nothing".
pub const SILENCE: Duration = Duration::from_millis(200);

pub fn local_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        shutdown_grace: Duration::from_millis(500),
        close_sessions_on_shutdown: false,
    }
}

/// Relay server running on a background task, bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: ConnectionRegistry,
    pub lifecycle: watch::Receiver<LifecycleState>,
    shutdown: CancellationToken,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(local_config()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let server = Server::bind(config).await.expect("Failed to bind test server");
        let addr = server.local_addr();
        let registry = server.registry();
        let lifecycle = server.subscribe_lifecycle();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(server.run(shutdown.clone()));

        Self {
            addr,
            registry,
            lifecycle,
            shutdown,
            handle,
        }
    }

    /// Connect a client and wait until the server has registered it.
    pub async fn connect(&self) -> TestClient {
        let expected = self.registry.len().await + 1;
        let client = TestClient::connect(self.addr).await;
        self.wait_for_sessions(expected).await;
        client
    }

    /// Wait until exactly `count` sessions are registered.
    pub async fn wait_for_sessions(&self, count: usize) {
        let registry = self.registry.clone();
        wait_until(move || {
            let registry = registry.clone();
            async move { registry.len().await == count }
        })
        .await;
    }

    /// Cancel the shutdown token and wait for `run` to return.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.cancel();
        tokio::time::timeout(WAIT_LIMIT, self.handle)
            .await
            .expect("Server did not stop in time")
            .expect("Server task panicked")
    }
}

/// Raw line-oriented TCP client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        let (reader, writer) = stream.into_split();
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    pub async fn send_line(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("Failed to send line");
    }

    /// Next line from the server; `None` on end-of-stream.
    pub async fn recv_line(&mut self) -> Option<String> {
        let mut line = String::new();
        let read = tokio::time::timeout(WAIT_LIMIT, self.reader.read_line(&mut line))
            .await
            .expect("Timed out waiting for a line")
            .expect("Failed to read line");
        (read > 0).then(|| line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// `true` if nothing arrives (and the stream stays open) for `SILENCE`.
    pub async fn is_silent(&mut self) -> bool {
        let mut line = String::new();
        tokio::time::timeout(SILENCE, self.reader.read_line(&mut line))
            .await
            .is_err()
    }

    /// Half-close: the server sees a normal end-of-stream.
    pub async fn shutdown_write(&mut self) {
        self.writer.shutdown().await.expect("Failed to shut down");
    }
}

/// Poll `condition` until it holds, failing the test after `WAIT_LIMIT`.
pub async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    tokio::time::timeout(WAIT_LIMIT, async {
        while !condition().await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Condition not met in time");
}
