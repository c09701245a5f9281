//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the relay requires from the
//! outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `StorageBackend`: string-keyed persistence (durable or in-memory)

pub mod storage;
