//! Usecases Layer - Orchestration Over the Ports
//!
//! The relay is the only orchestrator: it connects the application's
//! signal channels to whichever storage backend got bound at startup.

pub mod relay;

pub use relay::{RelayHandle, StoreRelay};
