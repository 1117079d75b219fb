//! Server configuration.
//!
//! Every flag falls back to an `RPS_*` environment variable.

use std::time::Duration;

use clap::Parser;

use crate::usecase::CountdownConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "rps-server")]
#[command(about = "Rock/paper/scissors matchmaking and game session server", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "RPS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(
        short = 'p',
        long,
        env = "RPS_PORT",
        default_value = "3000",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// PostgreSQL connection URL. Without it games live in memory and only this process
    /// can serve them.
    #[arg(long, env = "RPS_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, env = "RPS_DATABASE_MAX_CONNECTIONS", default_value = "10")]
    pub max_connections: u32,

    /// Milliseconds between countdown ticks
    #[arg(
        long,
        env = "RPS_COUNTDOWN_INTERVAL_MS",
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub countdown_interval_ms: u64,

    /// Do not end unfinished games at startup
    #[arg(long, env = "RPS_SKIP_STALE_SWEEP")]
    pub skip_stale_sweep: bool,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, env = "RPS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn countdown_config(&self) -> CountdownConfig {
        CountdownConfig {
            interval: Duration::from_millis(self.countdown_interval_ms),
            ..CountdownConfig::default()
        }
    }
}
