//! Configuration for the chat client.

use clap::Parser;
use linechat_shared::protocol::DEFAULT_PORT;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Name prefixed to every line this client sends
    pub display_name: String,
}

impl ClientConfig {
    /// Convenience: `host:port` socket string.
    pub fn server_addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Line-oriented TCP chat client
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct ClientArgs {
    /// Server's hostname or IP address
    pub host: String,

    /// Display name shown before each of your messages
    pub name: String,

    /// Server port
    #[arg(short, long, env = "LINECHAT_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl From<&ClientArgs> for ClientConfig {
    fn from(args: &ClientArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            display_name: args.name.clone(),
        }
    }
}
