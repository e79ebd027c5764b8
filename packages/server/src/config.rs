//! Configuration for the relay server.
//!
//! `ServerArgs` is the command line (with environment variable fallbacks);
//! `ServerConfig` is what the server actually runs with and can be built
//! directly in tests.

use std::time::Duration;

use clap::Parser;
use linechat_shared::protocol::DEFAULT_PORT;

/// Default time sessions get to finish on their own after shutdown begins.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub host: String,

    /// TCP port to listen on. `0` lets the OS pick one.
    pub port: u16,

    /// How long connected sessions may keep running after shutdown starts.
    pub shutdown_grace: Duration,

    /// Close every session as soon as shutdown starts instead of letting
    /// them drain.
    pub close_sessions_on_shutdown: bool,
}

impl ServerConfig {
    /// Convenience: `host:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            close_sessions_on_shutdown: false,
        }
    }
}

/// Line-oriented TCP chat relay server
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct ServerArgs {
    /// Address to bind to
    #[arg(long, env = "LINECHAT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "LINECHAT_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Milliseconds connected clients may keep chatting after Ctrl-C
    #[arg(long, env = "LINECHAT_SHUTDOWN_GRACE_MS", default_value_t = 5000)]
    pub shutdown_grace_ms: u64,

    /// Disconnect every client immediately on shutdown
    #[arg(long, env = "LINECHAT_CLOSE_SESSIONS_ON_SHUTDOWN")]
    pub close_sessions_on_shutdown: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl From<&ServerArgs> for ServerConfig {
    fn from(args: &ServerArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            shutdown_grace: Duration::from_millis(args.shutdown_grace_ms),
            close_sessions_on_shutdown: args.close_sessions_on_shutdown,
        }
    }
}
