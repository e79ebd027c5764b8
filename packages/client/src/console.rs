//! Local display shared by the inbound and outbound loops.

use std::{io, sync::Arc};

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::Mutex,
};

/// Line-oriented handle to the local display.
///
/// Clones share one writer, so lines printed from either loop never
/// interleave mid-line.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>,
}

impl Console {
    pub fn new<W>(out: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    /// Console backed by the process's stdout.
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }

    /// Print one line followed by a newline.
    pub async fn print_line(&self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await
    }

    /// Print a line, logging instead of failing if the display is gone.
    pub async fn notice(&self, line: &str) {
        if let Err(e) = self.print_line(line).await {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}
