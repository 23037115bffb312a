use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bookd_core::Scheduler;
use bookd_server::state::AppState;
use bookd_server::{app, singleton};
use bookd_store_sqlite::SqliteStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 4280;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Ensure only one instance is running
    let _lock = singleton::acquire_lock()?;

    let db_path = database_path()?;
    info!("using database at {}", db_path.display());
    let store = Arc::new(SqliteStore::open(&db_path)?);

    // The sqlite store backs both ports
    let scheduler = Arc::new(Scheduler::new(store.clone(), store));
    let state = AppState::new(scheduler);

    let addr = SocketAddr::from(([127, 0, 0, 1], port()));
    info!("bookd-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn port() -> u16 {
    std::env::var("BOOKD_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn database_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("BOOKD_DB") {
        return Ok(PathBuf::from(path));
    }

    let dir = dirs::data_dir()
        .context("Could not determine data directory")?
        .join("bookd");
    std::fs::create_dir_all(&dir)?;

    Ok(dir.join("bookd.db"))
}
