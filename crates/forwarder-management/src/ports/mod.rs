//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the forwarder registry.
//!
//! - **Driving Ports (Inbound)**: `ForwarderManagementApi`
//! - **Driven Ports (Outbound)**: `EventSink`, `ForwarderGateway`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
