//! Store Relay - The Persistence Adapter
//!
//! Bridges the application's persist/load signals to the bound
//! storage backend. Requests arrive on an mpsc channel and are
//! serviced strictly one at a time; load completions go out on a
//! broadcast channel the application subscribes to.
//!
//! The relay is stateless per event: all state lives in the backend,
//! and the backend bound at construction stays bound for the relay's
//! whole lifetime.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument, warn};

use crate::domain::signal::{StoreEvent, StoreRequest, StoredValue};
use crate::ports::storage::StorageBackend;

/// Application-side handle to a running relay.
///
/// Cheap to clone; every clone talks to the same relay task.
#[derive(Debug, Clone)]
pub struct RelayHandle {
    request_tx: mpsc::Sender<StoreRequest>,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl RelayHandle {
    /// Sender for raw [`StoreRequest`]s.
    #[must_use]
    pub fn sender(&self) -> mpsc::Sender<StoreRequest> {
        self.request_tx.clone()
    }

    /// Subscribe to load completions.
    ///
    /// Subscribe before issuing a load request; broadcast receivers
    /// only see events sent after subscription.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    /// Ask the relay to persist `value` under the configured key.
    ///
    /// # Errors
    /// Fails only if the relay has shut down and its request channel
    /// is closed. Backend write failures are never surfaced here.
    pub async fn persist(&self, value: StoredValue) -> anyhow::Result<()> {
        self.request_tx
            .send(StoreRequest::Persist(value))
            .await
            .map_err(|_| anyhow::anyhow!("relay is no longer running"))
    }

    /// Ask the relay to load the stored value.
    ///
    /// A `LoadCompleted` event follows on the broadcast channel only
    /// if a value exists; an empty store stays silent.
    ///
    /// # Errors
    /// Fails only if the relay has shut down.
    pub async fn request_load(&self) -> anyhow::Result<()> {
        self.request_tx
            .send(StoreRequest::Load)
            .await
            .map_err(|_| anyhow::anyhow!("relay is no longer running"))
    }
}

/// The persistence adapter: one backend, one key, one event loop.
pub struct StoreRelay {
    /// Storage bound at construction; never swapped at runtime.
    backend: Arc<dyn StorageBackend>,
    /// The single record slot everything persists under.
    key: String,
    request_rx: mpsc::Receiver<StoreRequest>,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl StoreRelay {
    /// Create a relay bound to `backend` and `key`, plus the handle
    /// the application uses to reach it.
    ///
    /// # Panics
    /// Panics if `channel_capacity` is zero (tokio channels require a
    /// positive capacity). The config layer rejects zero before the
    /// binary gets here; library callers must do the same.
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        key: impl Into<String>,
        channel_capacity: usize,
    ) -> (Self, RelayHandle) {
        let (request_tx, request_rx) = mpsc::channel(channel_capacity);
        let (event_tx, _) = broadcast::channel(channel_capacity);

        let handle = RelayHandle {
            request_tx,
            event_tx: event_tx.clone(),
        };
        let relay = Self {
            backend,
            key: key.into(),
            request_rx,
            event_tx,
        };
        (relay, handle)
    }

    /// Run the relay loop until shutdown or until every handle is
    /// dropped. Event-driven via `tokio::select!`, biased toward
    /// shutdown.
    #[instrument(skip(self, shutdown_rx), fields(key = %self.key, backend = %self.backend.kind()))]
    pub async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("Store relay started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    info!("Store relay shutting down");
                    return;
                }
                request = self.request_rx.recv() => {
                    match request {
                        Some(r) => self.handle_request(r).await,
                        None => {
                            info!("Request channel closed, store relay stopping");
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Dispatch a single request. Handled independently and
    /// statelessly; a backend failure never stops the loop.
    async fn handle_request(&self, request: StoreRequest) {
        match request {
            StoreRequest::Persist(value) => self.handle_persist(&value).await,
            StoreRequest::Load => self.handle_load().await,
        }
    }

    /// Write the value under the configured key, overwriting any
    /// previous value. Failures are logged, never surfaced to the
    /// application.
    async fn handle_persist(&self, value: &StoredValue) {
        match self.backend.set(&self.key, value.as_str()).await {
            Ok(()) => debug!(bytes = value.as_str().len(), "State persisted"),
            Err(e) => warn!(
                error = %format!("{e:#}"),
                "Persist failed, stored state unchanged"
            ),
        }
    }

    /// Read the configured key and emit `LoadCompleted` if a value
    /// exists. Absence is silent; so is a backend read failure.
    async fn handle_load(&self) {
        match self.backend.get(&self.key).await {
            Ok(Some(value)) => {
                let event = StoreEvent::LoadCompleted(StoredValue::new(value));
                if self.event_tx.send(event).is_err() {
                    debug!("Load completed with no subscribers listening");
                }
            }
            Ok(None) => debug!("No stored state, staying silent"),
            Err(e) => warn!(
                error = %format!("{e:#}"),
                "Load failed, treating as absent"
            ),
        }
    }
}
