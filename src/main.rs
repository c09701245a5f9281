//! Store Relay — Entry Point
//!
//! Initializes configuration, logging, backend selection, and the
//! relay loop. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Select storage backend (durable preferred, in-memory fallback)
//! 4. Spawn the relay loop
//! 5. Startup load — report whether prior state exists
//! 6. Wait for SIGINT → graceful shutdown

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use domain::signal::StoreEvent;
use ports::storage::StorageBackend;
use usecases::relay::StoreRelay;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.service.log_level)
                }),
        )
        .json()
        .init();

    info!(
        service = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        key = %config.store.key,
        "Starting store relay"
    );

    // ── 3. Shutdown signal channel ──────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    // ── 4. Bind storage backend for the process lifetime ────
    let backend = adapters::storage::select_backend(&config.store).await;
    if backend.is_healthy().await {
        info!(backend = %backend.kind(), "Storage backend bound and healthy");
    } else {
        warn!(
            backend = %backend.kind(),
            "Storage backend bound but unhealthy, persists may fail"
        );
    }

    // ── 5. Spawn the relay loop ─────────────────────────────
    let (relay, handle) = StoreRelay::new(
        backend,
        config.store.key.clone(),
        config.store.channel_capacity,
    );
    let mut events = handle.subscribe();
    let relay_task = tokio::spawn(relay.run(shutdown_tx.subscribe()));

    // ── 6. Startup load: report whether prior state exists ──
    handle
        .request_load()
        .await
        .context("Relay stopped before startup load")?;
    match tokio::time::timeout(Duration::from_secs(2), events.recv()).await {
        Ok(Ok(StoreEvent::LoadCompleted(value))) => {
            info!(
                bytes = value.as_str().len(),
                "Restored previously persisted state"
            );
        }
        _ => info!("No previously persisted state"),
    }

    info!("Relay running — waiting for SIGINT");

    // ── 7. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    // Signal the relay loop to stop and wait for it to drain
    let _ = shutdown_tx.send(());
    let _ = tokio::time::timeout(Duration::from_secs(5), relay_task).await;

    info!("Shutdown complete");
    Ok(())
}
