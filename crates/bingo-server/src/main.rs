//! Room server binary for multiplayer bingo.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `bingo-config.yaml` (or `BINGO_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the shared room state
//! 4. Serve the socket and status endpoints until `Ctrl-C`

use std::path::PathBuf;
use std::sync::Arc;

use bingo_server::config::{BingoConfig, DEFAULT_CONFIG_PATH};
use bingo_server::{AppState, ServerError};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::var("BINGO_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = BingoConfig::load(&config_path).map_err(ServerError::from)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        config_path = %config_path.display(),
        host = config.server.host,
        port = config.server.port,
        max_board_size = config.room.max_board_size,
        history_limit = ?config.room.history_limit,
        "Configuration loaded"
    );

    // 3. Create the room.
    let state = Arc::new(AppState::new(&config.room));

    // 4. Serve.
    bingo_server::start_server(&config.server, state).await?;

    info!("bingo-server shutdown complete");
    Ok(())
}
