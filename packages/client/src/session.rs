//! Client-side chat session.
//!
//! Two loops share one connection and a `disconnected` token:
//! - inbound: prints every line the server relays until the server goes away
//! - outbound: reads local input and sends `<name>: <line>` for each line
//!
//! Whichever loop finishes first cancels the token and the other stops at
//! its next await. The connection is released exactly once, after both
//! loops are done.

use linechat_shared::protocol::{decode_line, format_chat_line, is_exit_command};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
};
use tokio_util::sync::CancellationToken;

use crate::{config::ClientConfig, console::Console, error::ClientError};

/// Why the chat session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user typed the exit command.
    UserExit,
    /// Local input reached end-of-stream (or could not be read).
    InputClosed,
    /// The server closed the connection or reading from it failed.
    ServerDisconnected,
    /// Writing a message to the server failed.
    SendFailed,
}

/// Open the connection to the server.
pub async fn connect(config: &ClientConfig) -> Result<TcpStream, ClientError> {
    let addr = config.server_addr_string();
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.clone(),
            source,
        })?;
    stream.set_nodelay(true)?;
    tracing::debug!("Connected to {}", addr);
    Ok(stream)
}

/// Connect and chat using the process's stdin and stdout.
///
/// # Errors
///
/// Only connection setup fails with an error; once connected, every way the
/// chat can end is reported as an `ExitReason`.
pub async fn run_client(config: &ClientConfig) -> Result<ExitReason, ClientError> {
    let stream = connect(config).await?;

    let console = Console::stdout();
    console
        .notice("Connected to the server. You can start sending messages.")
        .await;

    let input = BufReader::new(tokio::io::stdin());
    Ok(run_session(stream, &config.display_name, input, console).await)
}

/// Run both chat loops over an established connection until one side ends.
pub async fn run_session<S, I>(
    stream: S,
    display_name: &str,
    mut input: I,
    console: Console,
) -> ExitReason
where
    S: AsyncRead + AsyncWrite + Send + 'static,
    I: AsyncBufRead + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let disconnected = CancellationToken::new();

    let inbound = tokio::spawn(inbound_loop(reader, console.clone(), disconnected.clone()));
    let reason = outbound_loop(
        &mut input,
        &mut writer,
        display_name,
        &console,
        &disconnected,
    )
    .await;
    disconnected.cancel();

    if let Err(e) = inbound.await {
        tracing::error!("Inbound loop failed: {}", e);
    }

    // Both loops are done; this is the only place the connection is released.
    if let Err(e) = writer.shutdown().await {
        tracing::debug!("Shutting down connection failed: {}", e);
    }
    drop(writer);
    console.notice("Connection closed.").await;

    reason
}

async fn outbound_loop<I, W>(
    input: &mut I,
    writer: &mut W,
    display_name: &str,
    console: &Console,
    disconnected: &CancellationToken,
) -> ExitReason
where
    I: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        let read = tokio::select! {
            biased;
            _ = disconnected.cancelled() => return ExitReason::ServerDisconnected,
            read = input.read_line(&mut line) => read,
        };

        match read {
            Ok(0) => {
                tracing::debug!("Input closed");
                disconnected.cancel();
                return ExitReason::InputClosed;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                disconnected.cancel();
                return ExitReason::InputClosed;
            }
        }

        let text = line.trim_end_matches(['\r', '\n']);
        if is_exit_command(text) {
            // set the flag before the notice so the inbound loop stays quiet
            disconnected.cancel();
            console.notice("Exiting chat...").await;
            return ExitReason::UserExit;
        }

        let payload = format!("{}\n", format_chat_line(display_name, text));
        let sent = match writer.write_all(payload.as_bytes()).await {
            Ok(()) => writer.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = sent {
            disconnected.cancel();
            console
                .notice(&format!("Error sending message: {e}"))
                .await;
            return ExitReason::SendFailed;
        }
    }
}

async fn inbound_loop<R>(reader: R, console: Console, disconnected: CancellationToken)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            _ = disconnected.cancelled() => return,
            read = reader.read_until(b'\n', &mut buf) => read,
        };

        match read {
            Ok(0) => break,
            Ok(_) => console.notice(&decode_line(&buf)).await,
            Err(e) => {
                tracing::debug!("Failed to read from server: {}", e);
                break;
            }
        }
    }

    // the outbound loop may have started shutting down while we were reading
    if !disconnected.is_cancelled() {
        disconnected.cancel();
        console.notice("Server disconnected. Exiting...").await;
    }
}
