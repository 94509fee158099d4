//! # Core Domain Entities
//!
//! Roles, list identifiers, the record kept for each created forwarder and
//! the events emitted on every committed state change.

use crate::domain::services::event_signature;
use crate::domain::value_objects::{Address, Hash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ROLES
// =============================================================================

/// Capabilities checked by the registry.
///
/// `Admin` is held by exactly one address; `Flusher` by every member of
/// the flusher list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May mutate both allow-lists.
    Admin,
    /// May trigger a forwarder flush.
    Flusher,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Flusher => write!(f, "FLUSHER"),
        }
    }
}

// =============================================================================
// ALLOW-LISTS
// =============================================================================

/// The two independent allow-lists held by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllowList {
    /// Addresses allowed to trigger flushes.
    Flushers,
    /// Addresses a new forwarder may be bound to.
    ValidFlushToAddresses,
}

impl AllowList {
    /// Both lists, in storage order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Flushers, Self::ValidFlushToAddresses]
    }
}

// =============================================================================
// FORWARDER RECORD
// =============================================================================

/// Creation record for a forwarder.
///
/// The destination is fixed at creation. Removing it from the valid
/// flush-to list later does not touch this record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwarderRecord {
    /// Address of the created forwarder.
    pub forwarder: Address,
    /// Destination the forwarder is bound to.
    pub destination: Address,
    /// Caller that requested the creation.
    pub creator: Address,
    /// Creation nonce the forwarder address was derived from.
    pub nonce: u64,
}

// =============================================================================
// REGISTRY EVENTS
// =============================================================================

/// Structured notification emitted once per committed state change.
///
/// Argument order matches the event signatures callers index on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "args")]
pub enum RegistryEvent {
    /// `AddFlusher(address)`
    AddFlusher {
        /// Newly authorized flusher.
        address: Address,
    },
    /// `RemoveFlusher(address)`
    RemoveFlusher {
        /// Revoked flusher.
        address: Address,
    },
    /// `AddFlushToAddress(address)`
    AddFlushToAddress {
        /// Newly valid destination.
        address: Address,
    },
    /// `RemoveFlushToAddress(address)`
    RemoveFlushToAddress {
        /// Revoked destination.
        address: Address,
    },
    /// `ForwarderCreated(address,address)`
    ForwarderCreated {
        /// Caller that requested the forwarder.
        creator: Address,
        /// Address of the new forwarder.
        forwarder: Address,
    },
    /// `ForwarderFlushed(address,address,address,uint256)`
    ForwarderFlushed {
        /// Flusher that triggered the flush.
        flusher: Address,
        /// Flushed forwarder.
        forwarder: Address,
        /// Destination that received the value.
        destination: Address,
        /// Amount reported by the forwarder.
        amount: U256,
    },
    /// `Initialized(address)`
    Initialized {
        /// Admin installed by the one-shot setup.
        admin: Address,
    },
}

impl RegistryEvent {
    /// Event name as it appears in the audit log.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddFlusher { .. } => "AddFlusher",
            Self::RemoveFlusher { .. } => "RemoveFlusher",
            Self::AddFlushToAddress { .. } => "AddFlushToAddress",
            Self::RemoveFlushToAddress { .. } => "RemoveFlushToAddress",
            Self::ForwarderCreated { .. } => "ForwarderCreated",
            Self::ForwarderFlushed { .. } => "ForwarderFlushed",
            Self::Initialized { .. } => "Initialized",
        }
    }

    /// Canonical signature, e.g. `AddFlusher(address)`.
    #[must_use]
    pub fn signature(&self) -> &'static str {
        match self {
            Self::AddFlusher { .. } => "AddFlusher(address)",
            Self::RemoveFlusher { .. } => "RemoveFlusher(address)",
            Self::AddFlushToAddress { .. } => "AddFlushToAddress(address)",
            Self::RemoveFlushToAddress { .. } => "RemoveFlushToAddress(address)",
            Self::ForwarderCreated { .. } => "ForwarderCreated(address,address)",
            Self::ForwarderFlushed { .. } => "ForwarderFlushed(address,address,address,uint256)",
            Self::Initialized { .. } => "Initialized(address)",
        }
    }

    /// First log topic: keccak256 of [`Self::signature`].
    #[must_use]
    pub fn topic(&self) -> Hash {
        event_signature(self.signature())
    }

    /// Address arguments in signature order.
    #[must_use]
    pub fn address_args(&self) -> Vec<Address> {
        match *self {
            Self::AddFlusher { address }
            | Self::RemoveFlusher { address }
            | Self::AddFlushToAddress { address }
            | Self::RemoveFlushToAddress { address } => vec![address],
            Self::ForwarderCreated { creator, forwarder } => vec![creator, forwarder],
            Self::ForwarderFlushed {
                flusher,
                forwarder,
                destination,
                ..
            } => vec![flusher, forwarder, destination],
            Self::Initialized { admin } => vec![admin],
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
