//! showtrack-dash - watch-progress dashboard service
//!
//! Opens (or creates) the SQLite database under the resolved root folder and
//! serves the dashboard API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showtrack_common::config::{database_path, load_toml_config, resolve_root_folder, ENV_ROOT_FOLDER};
use showtrack_common::db::init_database;
use showtrack_common::store::SqliteStore;
use showtrack_dash::{build_router, AppState};

const DEFAULT_PORT: u16 = 5780;
const DEFAULT_BIND: &str = "127.0.0.1";

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "showtrack-dash")]
#[command(about = "Watch-progress dashboards for shows and universes")]
#[command(version)]
struct Args {
    /// HTTP port (overrides config file)
    #[arg(short, long, env = "SHOWTRACK_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config file)
    #[arg(short, long, env = "SHOWTRACK_BIND")]
    bind: Option<String>,

    /// Folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file; must exist when given
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_toml_config(args.config.as_deref()).context("Failed to load config")?;

    let default_filter = config
        .log_level
        .clone()
        .unwrap_or_else(|| "showtrack_dash=info,showtrack_common=info,tower_http=info".to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting showtrack-dash v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ENV_ROOT_FOLDER, &config);
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready");

    let app = build_router(AppState::new(SqliteStore::new(pool.clone())));

    let port = args.port.or(config.port).unwrap_or(DEFAULT_PORT);
    let bind = args
        .bind
        .or(config.bind_address)
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("showtrack-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
