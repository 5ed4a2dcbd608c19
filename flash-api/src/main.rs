//! flash-api - Flashcard API server
//!
//! Serves list / get / create over the flashcards table stored in
//! `<root_folder>/flashcards.db`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flash_common::config::{config_source, database_path, load_toml_config, resolve_root_folder};
use flash_common::db::init_database;
use flash_api::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for flash-api
#[derive(Parser, Debug)]
#[command(name = "flash-api")]
#[command(about = "Flashcard API server")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to <config_dir>/flashcards/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder holding flashcards.db
    #[arg(short, long, env = "FLASHCARDS_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "FLASHCARDS_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FLASHCARDS_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = load_toml_config(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level_or("info").into()),
        )
        .init();

    info!(
        "Starting Flashcard API (flash-api) v{}",
        env!("CARGO_PKG_VERSION")
    );
    match config_source(args.config.as_deref()) {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let app = build_router(AppState::new(pool));

    let host = args.host.unwrap_or(toml_config.server.host);
    let port = args.port.unwrap_or(toml_config.server.port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("flash-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
