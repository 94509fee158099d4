//! # Forwarder Management - Flush Allow-Lists and Forwarder Factory
//!
//! ## Purpose
//!
//! Administrative core of a deposit-forwarding system. Maintains two
//! Admin-controlled allow-lists (accounts allowed to trigger flushes, and
//! destinations forwarders may be bound to) and creates forwarders at
//! deterministic addresses, each permanently bound to one destination.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | No duplicate members in either allow-list | `domain/membership.rs` - `MembershipSet::insert()` |
//! | INVARIANT-2 | Only the Admin mutates allow-lists | `domain/registry.rs` - `ensure_admin()` |
//! | INVARIANT-3 | Forwarders only bind to valid destinations | `domain/registry.rs` - `prepare_forwarder()` |
//! | INVARIANT-4 | Forwarder address derived from registry and nonce | `domain/invariants.rs` - `check_forwarder_derivation_invariant()` |
//! | INVARIANT-5 | Failed calls leave no partial state and emit nothing | `service.rs` - `apply()` |
//!
//! ## Rejection Reasons
//!
//! | Condition | Reason |
//! |-----------|--------|
//! | Caller is not Admin | `ForwarderManagement: Must have ADMIN ROLE` |
//! | Add of a present address | `ForwarderManagement: Address already exists` |
//! | Remove of an absent address | `ForwarderManagement: Address already removed or doesnt exist` |
//! | Unregistered destination | `ForwarderManagement: Invalid flush to address` |
//! | Caller is not a flusher | `ForwarderManagement: Must have FLUSHER ROLE` |
//! | Search miss | `CustomArray: Element not found` |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `EventSink` | Deliver committed events |
//! | `ForwarderGateway` | Instantiate and flush forwarders |
//!
//! ## Usage Example
//!
//! ```ignore
//! use forwarder_management::prelude::*;
//!
//! let service = create_test_service();
//! service.initialize(admin, treasury).await?;
//! service.add_flusher(admin, hot_wallet).await?;
//!
//! let forwarder = service.create_forwarder(admin, treasury).await?;
//! let moved = service.flush_forwarder_tokens(hot_wallet, forwarder).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{AllowList, ForwarderRecord, RegistryEvent, Role};

    // Value objects
    pub use crate::domain::value_objects::{Address, AddressParseError, Hash, U256};

    // Domain logic
    pub use crate::domain::custom_array::find_index;
    pub use crate::domain::membership::MembershipSet;
    pub use crate::domain::registry::{ForwarderManagement, RegistrySnapshot};
    pub use crate::domain::services::{compute_forwarder_address, event_signature, keccak256};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::ForwarderManagementApi;
    pub use crate::ports::outbound::{EventSink, ForwarderGateway};

    // Events
    pub use crate::events::{
        topics, EventEnvelope, RegistryRequestPayload, RegistryResponsePayload, ResponseValue,
    };

    // Errors
    pub use crate::errors::{
        reasons, ArrayError, ConfigError, ErrorKind, GatewayError, RegistryError,
    };

    // Config
    pub use crate::config::RegistryConfig;

    // Adapters
    pub use crate::adapters::{
        BroadcastEventSink, InMemoryEventLog, InMemoryForwarderGateway, RegistryRequestHandler,
        TracingEventSink,
    };

    // Service
    pub use crate::service::{create_test_service, ForwarderManagementService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component name used in logs and topics.
pub const COMPONENT_NAME: &str = "ForwarderManagement";

// =============================================================================
// TESTS
// =============================================================================
