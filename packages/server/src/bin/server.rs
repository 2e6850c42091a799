//! Multi-room WebSocket chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin engawa-server
//! cargo run --bin engawa-server -- --host 0.0.0.0 --port 3110 --admin-token s3cret
//! ```

use clap::Parser;

use engawa_server::{
    config::{Args, ServerConfig},
    ui::{AppState, Server},
};
use engawa_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match ServerConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    if config.admin_token.is_none() {
        tracing::warn!("No admin token configured, clearing messages is disabled");
    }

    let app_state = AppState::in_memory(&config);
    let server = Server::new(app_state, config.body_limit_bytes);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
