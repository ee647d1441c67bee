//! Noughts - unified CLI
//!
//! Serves the game over HTTP or plays it in the terminal.

use anyhow::Result;
use clap::Parser;
use noughts_core::{Engine, HistoryShape, StrategyMode};
use noughts_server::{
    AppState, Cli, Command, GameRepository, GameService, ServeArgs, ServerConfig, router,
    run_terminal,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,noughts_server=debug,noughts_core=info";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_server(args).await,
        Command::Play { mode, seed } => run_play(mode, seed).await,
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Run the HTTP game server
#[instrument(skip_all)]
async fn run_server(args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let config = ServerConfig::load(args.config.as_deref(), args.overrides())?;

    let repository = GameRepository::new(config.database_url().clone())?;
    let migrations = repository.clone();
    tokio::task::spawn_blocking(move || migrations.run_migrations()).await??;

    let engine = Engine::new(config.mode().build(*config.seed()), *config.history());
    let service = GameService::new(engine, Arc::new(repository), *config.mode());
    let app = router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(address = %listener.local_addr()?, "Server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Completes on Ctrl+C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
    }
}

/// Play in the terminal against the engine
#[instrument]
async fn run_play(mode: StrategyMode, seed: Option<u64>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let engine = Engine::new(mode.build(seed), HistoryShape::PerPly);
    let finished = tokio::task::spawn_blocking(move || {
        run_terminal(&engine, std::io::stdin().lock(), std::io::stdout().lock())
    })
    .await??;

    info!(games = finished.len(), "Goodbye");
    Ok(())
}
