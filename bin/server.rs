// Expense Tracker - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use expense_tracker::server::{app, AppState};
use expense_tracker::{logging, open_database, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "expense-server", version, about = "Expense tracker REST API")]
struct Args {
    /// Config file (defaults to ./expense-tracker.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `server.port`
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    logging::init(&config.logging.filter);

    let conn = open_database(&config.database.path)?;
    tracing::info!(path = ?config.database.path, "database opened");

    let router = app(AppState::new(conn), &config);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("server running on http://{}", addr);
    tracing::info!("API: http://{}/api/expenses", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl+C received, shutting down...");
}
