use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mines_server::{Args, GameStore, ServerConfig, router};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = ServerConfig::from_args(&args);
    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("Could not bind {}", config.socket_addr()))?;
    log::info!("Starting server on {}", listener.local_addr()?);

    let store = Arc::new(GameStore::new());
    axum::serve(listener, router(store))
        .await
        .context("Server stopped unexpectedly")
}
