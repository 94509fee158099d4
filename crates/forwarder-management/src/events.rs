//! # Event Schema
//!
//! Wire types for the registry: the envelope every committed
//! [`RegistryEvent`] is published in, and the request/response payloads
//! accepted by [`RegistryRequestHandler`](crate::adapters::RegistryRequestHandler).
//!
//! Caller identity travels in the request, never in the event: events only
//! carry the arguments of their signature.

use crate::domain::entities::RegistryEvent;
use crate::domain::value_objects::{Address, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// EVENT ENVELOPE
// =============================================================================

/// A committed event together with its delivery metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Correlation ID of the call that produced the event.
    pub correlation_id: Uuid,
    /// Position in the registry's event log, starting at zero.
    pub sequence: u64,
    /// Registry that emitted the event.
    pub registry: Address,
    /// The event itself.
    pub event: RegistryEvent,
}

// =============================================================================
// REQUEST / RESPONSE PAYLOADS
// =============================================================================

/// A call against the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum RegistryRequestPayload {
    /// One-shot setup.
    Initialize {
        /// Admin to install.
        admin: Address,
        /// First valid flush-to address.
        flush_to_address: Address,
    },
    /// Admin: authorize a flusher.
    AddFlusher {
        /// Flusher to add.
        address: Address,
    },
    /// Admin: revoke a flusher.
    RemoveFlusher {
        /// Flusher to remove.
        address: Address,
    },
    /// Admin: allow a destination.
    AddValidFlushToAddress {
        /// Destination to add.
        address: Address,
    },
    /// Admin: disallow a destination.
    RemoveValidFlushToAddress {
        /// Destination to remove.
        address: Address,
    },
    /// View: flusher membership.
    IsFlusher {
        /// Address to test.
        address: Address,
    },
    /// View: destination membership.
    IsValidFlushToAddress {
        /// Address to test.
        address: Address,
    },
    /// Create a forwarder bound to `destination`.
    CreateForwarder {
        /// Destination to bind.
        destination: Address,
    },
    /// Flusher: flush a forwarder to its destination.
    FlushForwarderTokens {
        /// Forwarder to flush.
        forwarder: Address,
    },
    /// Pure: linear search over a caller-supplied list.
    FindIndex {
        /// List to search.
        sequence: Vec<Address>,
        /// Element to find.
        target: Address,
    },
}

impl RegistryRequestPayload {
    /// Returns true if the request can change registry state.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::IsFlusher { .. } | Self::IsValidFlushToAddress { .. } | Self::FindIndex { .. }
        )
    }
}

/// Value returned by a successful call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ResponseValue {
    /// The call returns nothing.
    Unit,
    /// Membership query result.
    Bool(bool),
    /// Created forwarder address.
    Address(Address),
    /// Search result.
    Index(u64),
    /// Flushed amount.
    Amount(U256),
}

/// Outcome of a [`RegistryRequestPayload`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryResponsePayload {
    /// Whether the call succeeded.
    pub success: bool,
    /// Return value (`Unit` on failure).
    pub value: ResponseValue,
    /// Rejection reason, verbatim (if failed).
    pub revert_reason: Option<String>,
}

impl RegistryResponsePayload {
    /// Successful response carrying `value`.
    #[must_use]
    pub fn ok(value: ResponseValue) -> Self {
        Self {
            success: true,
            value,
            revert_reason: None,
        }
    }

    /// Failed response carrying `reason`.
    #[must_use]
    pub fn revert(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            value: ResponseValue::Unit,
            revert_reason: Some(reason.into()),
        }
    }
}

// =============================================================================
// EVENT BUS TOPICS
// =============================================================================

/// Event topics for the registry.
pub mod topics {
    /// Topic for committed registry events.
    pub const REGISTRY_EVENTS: &str = "forwarder_management.events";

    /// Topic for inbound registry calls.
    pub const REGISTRY_REQUEST: &str = "forwarder_management.request";

    /// Topic for call outcomes.
    pub const REGISTRY_RESPONSE: &str = "forwarder_management.response";

    /// Dead letter queue for undecodable requests.
    pub const DLQ: &str = "dlq.forwarder_management";
}

// =============================================================================
// TESTS
// =============================================================================
