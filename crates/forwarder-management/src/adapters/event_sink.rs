//! # Event Sink Adapters
//!
//! Concrete transports for committed registry events:
//! - `InMemoryEventLog`: append-only log, used by tests and snapshots
//! - `TracingEventSink`: structured `tracing` records
//! - `BroadcastEventSink`: `tokio::sync::broadcast` fan-out to subscribers

use crate::events::EventEnvelope;
use crate::ports::outbound::EventSink;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::info;

// =============================================================================
// IN-MEMORY LOG
// =============================================================================

/// Append-only in-memory event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    entries: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every envelope recorded so far.
    #[must_use]
    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.entries.read().clone()
    }

    /// Number of envelopes recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Most recent envelope.
    #[must_use]
    pub fn last(&self) -> Option<EventEnvelope> {
        self.entries.read().last().cloned()
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, envelope: &EventEnvelope) {
        self.entries.write().push(envelope.clone());
    }
}

// =============================================================================
// TRACING
// =============================================================================

/// Writes each event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, envelope: &EventEnvelope) {
        info!(
            target: "forwarder_management::events",
            correlation_id = %envelope.correlation_id,
            sequence = envelope.sequence,
            registry = ?envelope.registry,
            event = envelope.event.name(),
            args = ?envelope.event.address_args(),
            "{}",
            envelope.event.signature()
        );
    }
}

// =============================================================================
// BROADCAST
// =============================================================================

/// Fans events out to any number of async subscribers.
///
/// Slow subscribers lag and lose the oldest events; publishing never waits.
#[derive(Debug, Clone)]
pub struct BroadcastEventSink {
    sender: broadcast::Sender<EventEnvelope>,
}

impl BroadcastEventSink {
    /// Create a channel holding up to `capacity` undelivered events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for BroadcastEventSink {
    fn publish(&self, envelope: &EventEnvelope) {
        // No subscribers is not an error
        let _ = self.sender.send(envelope.clone());
    }
}

// =============================================================================
// TESTS
// =============================================================================
