//! Client integration tests against an in-process relay server.

use std::time::Duration;

use linechat_client::{ClientConfig, ClientError, ExitReason, console::Console, run_session};
use linechat_server::{Server, ServerConfig, infrastructure::ConnectionRegistry};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, duplex},
    net::TcpStream,
};
use tokio_util::sync::CancellationToken;

const WAIT_LIMIT: Duration = Duration::from_secs(5);

async fn start_server(close_sessions_on_shutdown: bool) -> (Server, CancellationToken) {
    let server = Server::bind(ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        shutdown_grace: Duration::from_millis(500),
        close_sessions_on_shutdown,
    })
    .await
    .expect("Failed to bind test server");
    (server, CancellationToken::new())
}

async fn wait_for_sessions(registry: &ConnectionRegistry, count: usize) {
    tokio::time::timeout(WAIT_LIMIT, async {
        while registry.len().await != count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Session count not reached in time");
}

async fn read_line(reader: &mut (impl AsyncBufRead + Unpin)) -> Option<String> {
    let mut line = String::new();
    let read = tokio::time::timeout(WAIT_LIMIT, reader.read_line(&mut line))
        .await
        .expect("Timed out waiting for a line")
        .expect("Failed to read line");
    (read > 0).then(|| line.trim_end().to_string())
}

#[tokio::test]
async fn test_quit_is_never_transmitted() {
    // テスト項目: 終了コマンドはサーバーに送られず、サーバーは通常の EOF を観測する
    // given (前提条件): 観測用クライアントが接続済み
    let (server, shutdown) = start_server(false).await;
    let addr = server.local_addr();
    let registry = server.registry();
    let running = tokio::spawn(server.run(shutdown.clone()));

    let observer = TcpStream::connect(addr).await.unwrap();
    let mut observer = BufReader::new(observer);
    wait_for_sessions(&registry, 1).await;

    let stream = TcpStream::connect(addr).await.unwrap();
    wait_for_sessions(&registry, 2).await;
    let (console_out, _console) = duplex(4096);

    // when (操作):
    let reason = run_session(
        stream,
        "alice",
        &b"hi\n/quit\n"[..],
        Console::new(console_out),
    )
    .await;

    // then (期待する結果):
    assert_eq!(reason, ExitReason::UserExit);
    assert_eq!(read_line(&mut observer).await.as_deref(), Some("alice: hi"));
    wait_for_sessions(&registry, 1).await;
    let mut rest = [0u8; 64];
    let silent = tokio::time::timeout(Duration::from_millis(200), observer.read(&mut rest)).await;
    assert!(silent.is_err(), "observer received data derived from /quit");

    shutdown.cancel();
    running.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_two_clients_chat_until_server_stops() {
    // テスト項目: 2 つのクライアント間で中継され、サーバー停止時には双方が切断を検知する
    // given (前提条件):
    let (server, shutdown) = start_server(true).await;
    let addr = server.local_addr();
    let registry = server.registry();
    let running = tokio::spawn(server.run(shutdown.clone()));

    let (mut alice_keys, alice_input) = duplex(1024);
    let (alice_out, alice_screen) = duplex(4096);
    let alice_stream = TcpStream::connect(addr).await.unwrap();
    wait_for_sessions(&registry, 1).await;
    let alice = tokio::spawn(async move {
        run_session(
            alice_stream,
            "alice",
            BufReader::new(alice_input),
            Console::new(alice_out),
        )
        .await
    });

    let (mut bob_keys, bob_input) = duplex(1024);
    let (bob_out, bob_screen) = duplex(4096);
    let bob_stream = TcpStream::connect(addr).await.unwrap();
    wait_for_sessions(&registry, 2).await;
    let bob = tokio::spawn(async move {
        run_session(
            bob_stream,
            "bob",
            BufReader::new(bob_input),
            Console::new(bob_out),
        )
        .await
    });
    let mut alice_screen = BufReader::new(alice_screen);
    let mut bob_screen = BufReader::new(bob_screen);

    // when (操作):
    alice_keys.write_all(b"hello bob\n").await.unwrap();
    assert_eq!(read_line(&mut bob_screen).await.as_deref(), Some("alice: hello bob"));
    bob_keys.write_all(b"hi alice\n").await.unwrap();
    assert_eq!(read_line(&mut alice_screen).await.as_deref(), Some("bob: hi alice"));

    shutdown.cancel();
    running.await.unwrap().unwrap();

    // then (期待する結果):
    assert_eq!(alice.await.unwrap(), ExitReason::ServerDisconnected);
    assert_eq!(bob.await.unwrap(), ExitReason::ServerDisconnected);
    assert_eq!(
        read_line(&mut bob_screen).await.as_deref(),
        Some("Server disconnected. Exiting...")
    );
    assert_eq!(read_line(&mut bob_screen).await.as_deref(), Some("Connection closed."));
}

#[tokio::test]
async fn test_connect_failure_is_reported() {
    // テスト項目: 接続できない場合は Connect エラーが返される
    // given (前提条件): 一度バインドして解放したポート
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    // when (操作):
    let result = linechat_client::session::connect(&ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        display_name: "alice".to_string(),
    })
    .await;

    // then (期待する結果):
    assert!(matches!(result, Err(ClientError::Connect { .. })));
}
