//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the registry's ports.
//!
//! - Event sinks: in-memory log, `tracing`, broadcast channel
//! - Forwarder gateway: in-memory ledger of deployed forwarders
//! - Request handler: JSON request/response dispatch onto the inbound API

pub mod event_sink;
pub mod forwarder_gateway;
pub mod request_handler;

pub use event_sink::*;
pub use forwarder_gateway::*;
pub use request_handler::*;
