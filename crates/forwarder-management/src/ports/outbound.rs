//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the registry depends on:
//! - Event transport (`EventSink`)
//! - The forwarder objects themselves (`ForwarderGateway`)

use crate::domain::entities::ForwarderRecord;
use crate::domain::value_objects::{Address, U256};
use crate::errors::GatewayError;
use crate::events::EventEnvelope;
use async_trait::async_trait;

// =============================================================================
// EVENT SINK
// =============================================================================

/// Destination for committed registry events.
///
/// Called with the registry write lock held, so envelopes arrive in
/// sequence order. Implementations must not block.
pub trait EventSink: Send + Sync {
    /// Deliver one envelope.
    fn publish(&self, envelope: &EventEnvelope);
}

// =============================================================================
// FORWARDER GATEWAY
// =============================================================================

/// Interface to the forwarder objects created by the registry.
///
/// The registry decides *whether* a forwarder may be created or flushed;
/// the gateway performs the creation and the value transfer.
///
/// ## Implementation Notes
///
/// `flush` talks to a value-bearing object. Implementations must guard it
/// against reentrancy (lock, or update balances before the transfer).
#[async_trait]
pub trait ForwarderGateway: Send + Sync {
    /// Instantiate a forwarder at `record.forwarder`, bound to
    /// `record.destination`, owned by the registry.
    ///
    /// # Errors
    ///
    /// The registry is left unchanged if this fails.
    async fn deploy(&self, record: &ForwarderRecord) -> Result<(), GatewayError>;

    /// Move everything held by `forwarder` to `destination`.
    ///
    /// Returns the amount moved (zero if the forwarder was empty).
    async fn flush(&self, forwarder: Address, destination: Address) -> Result<U256, GatewayError>;
}

// =============================================================================
// TESTS
// =============================================================================
