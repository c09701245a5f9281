//! Adapters Layer - Concrete Implementations of the Ports
//!
//! Everything that touches the outside world lives here. The relay
//! and the domain layer only ever see the port traits.

pub mod storage;
