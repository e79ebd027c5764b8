//! Line-oriented TCP chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin linechat-client -- <server-host> <display-name>
//! ```
//!
//! Type `/quit` to leave.

use clap::Parser;
use linechat_client::config::{ClientArgs, ClientConfig};
use linechat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ClientArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let code = match linechat_client::run_client(&ClientConfig::from(&args)).await {
        Ok(reason) => {
            tracing::debug!("Chat ended: {:?}", reason);
            0
        }
        Err(e) => {
            eprintln!("Error connecting to server: {}", e);
            1
        }
    };

    // Exit explicitly: a blocking stdin read may still be pending and would
    // otherwise keep the runtime alive until the next keypress.
    std::process::exit(code);
}
