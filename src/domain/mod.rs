//! Domain Layer - Signal Vocabulary
//!
//! Pure types only: the requests the application sends the relay and
//! the completion event the relay sends back. No I/O, no channels,
//! no knowledge of any concrete storage backend.

pub mod signal;
