//! Notekeep Server - HTTP API for the note store

mod api;

use notekeep_core::{DiskStore, MemoryStore, NoteStore, StoreConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address
    pub http_addr: SocketAddr,
    /// Storage directory for the disk backend
    pub storage_dir: PathBuf,
    /// Maximum live notes per backend
    pub max_notes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:3000".parse().expect("static address"),
            storage_dir: PathBuf::from("storage"),
            max_notes: notekeep_core::config::DEFAULT_MAX_NOTES,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the environment, falling back to defaults on
    /// anything missing or malformed: `PORT`, `STORAGE_PATH`, `MAX_NOTES`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let http_addr = std::env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse::<u16>().ok())
            .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
            .unwrap_or(defaults.http_addr);

        let storage_dir = std::env::var("STORAGE_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir);

        let max_notes = std::env::var("MAX_NOTES")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_notes);

        Self {
            http_addr,
            storage_dir,
            max_notes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = ServerConfig::from_env();

    info!("Starting notekeep server...");
    info!("Storage directory: {:?}", config.storage_dir);
    info!("Max notes per backend: {}", config.max_notes);

    let disk: Arc<dyn NoteStore> = Arc::new(DiskStore::new(StoreConfig {
        dir: config.storage_dir.clone(),
        max_notes: config.max_notes,
    }));
    let mem: Arc<dyn NoteStore> = Arc::new(MemoryStore::new(config.max_notes));

    let app = api::create_router(disk, mem);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("notekeep listening on {}", config.http_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
