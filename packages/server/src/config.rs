//! Server configuration.
//!
//! Every flag can also be set through an `ENGAWA_*` environment variable.

use clap::Parser;

use crate::domain::{AdminToken, ValueObjectError};

/// Default listening port
pub const DEFAULT_PORT: u16 = 3110;

/// Default request body ceiling (10 MiB)
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "engawa-server")]
#[command(about = "Multi-room WebSocket chat server", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "ENGAWA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "ENGAWA_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum accepted request body (and WebSocket message) size in bytes
    #[arg(long, env = "ENGAWA_BODY_LIMIT_BYTES", default_value_t = DEFAULT_BODY_LIMIT_BYTES)]
    pub body_limit_bytes: usize,

    /// Token required to clear all messages; clearing is disabled when unset
    #[arg(long, env = "ENGAWA_ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// bcrypt cost factor for password hashing
    #[arg(long, env = "ENGAWA_BCRYPT_COST", value_parser = clap::value_parser!(u32).range(4..=31))]
    pub bcrypt_cost: Option<u32>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    pub log_level: String,
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
    pub admin_token: Option<AdminToken>,
    pub bcrypt_cost: Option<u32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            admin_token: None,
            bcrypt_cost: None,
        }
    }
}

impl TryFrom<Args> for ServerConfig {
    type Error = ValueObjectError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        // 空文字列は未設定と同じ扱い
        let admin_token = args
            .admin_token
            .filter(|token| !token.is_empty())
            .map(|token| AdminToken::new(&token))
            .transpose()?;

        Ok(Self {
            host: args.host,
            port: args.port,
            body_limit_bytes: args.body_limit_bytes,
            admin_token,
            bcrypt_cost: args.bcrypt_cost,
        })
    }
}
