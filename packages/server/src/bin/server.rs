//! Line-oriented TCP chat relay server.
//!
//! Every line a client sends is rebroadcast to all other connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin linechat-server -- --port 12345
//! ```

use clap::Parser;
use linechat_server::config::{ServerArgs, ServerConfig};
use linechat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = linechat_server::run_server(ServerConfig::from(&args)).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
