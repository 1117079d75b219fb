//! Rock/paper/scissors game server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin rps-server
//! cargo run --bin rps-server -- --port 3000 --database-url postgres://localhost/rps
//! ```

use std::sync::Arc;

use clap::Parser;
use rps_server::{
    config::ServerConfig,
    domain::GameRepository,
    infrastructure::{
        notification::{InMemoryNotificationBus, PgNotificationPublisher, PgNotificationSubscriber},
        repository::{InMemoryGameRepository, PostgresGameRepository, postgres::connect_pool},
    },
    ui::{AppState, Server, ServerError, shutdown_signal},
};
use rps_shared::logger::setup_logger;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(&[env!("CARGO_BIN_NAME")], &config.log_level);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let countdown_config = config.countdown_config();

    match &config.database_url {
        Some(database_url) => {
            // 1. Database: pool, sanity check, schema, stale games
            let pool = connect_pool(database_url, config.max_connections).await?;
            let repository = PostgresGameRepository::new(pool.clone());
            repository.verify_connection().await?;
            repository.migrate().await?;
            tracing::info!("Database ready");
            if !config.skip_stale_sweep {
                sweep_stale_games(&repository).await?;
            }

            // 2. Notification bus
            let subscriber = PgNotificationSubscriber::connect(&pool).await?;
            let publisher = Arc::new(PgNotificationPublisher::new(pool));

            // 3. Server
            let state = AppState::build(Arc::new(repository), publisher, countdown_config);
            let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
            Server::new(state)
                .run(listener, subscriber, shutdown_signal())
                .await
        }
        None => {
            tracing::warn!("No database configured, games live in this process only");
            let bus = InMemoryNotificationBus::new();
            let subscriber = bus.subscribe();
            let state = AppState::build(
                Arc::new(InMemoryGameRepository::new()),
                Arc::new(bus),
                countdown_config,
            );
            let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
            Server::new(state)
                .run(listener, subscriber, shutdown_signal())
                .await
        }
    }
}

/// No countdown survives a restart, so games left unfinished would never end.
async fn sweep_stale_games(repository: &dyn GameRepository) -> Result<(), ServerError> {
    let swept = repository.sweep_unfinished_games().await?;
    if swept > 0 {
        tracing::info!("Ended {} unfinished game(s) left from a previous run", swept);
    }
    Ok(())
}
