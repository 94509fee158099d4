//! # Error Types
//!
//! All error types for the forwarder registry.
//!
//! The `Display` text of [`RegistryError`] and [`ArrayError`] is part of the
//! external contract: existing callers match on these reason strings
//! literally, so they must not be reworded.

use crate::domain::value_objects::Address;
use thiserror::Error;

// =============================================================================
// REASON STRINGS
// =============================================================================

/// Verbatim rejection reasons.
pub mod reasons {
    /// Caller does not hold the Admin role.
    pub const MISSING_ADMIN_ROLE: &str = "ForwarderManagement: Must have ADMIN ROLE";

    /// Caller does not hold the Flusher role.
    pub const MISSING_FLUSHER_ROLE: &str = "ForwarderManagement: Must have FLUSHER ROLE";

    /// Add on an address that is already a member.
    pub const ADDRESS_EXISTS: &str = "ForwarderManagement: Address already exists";

    /// Remove on an address that is not a member.
    pub const ADDRESS_MISSING: &str =
        "ForwarderManagement: Address already removed or doesnt exist";

    /// Forwarder creation against an unregistered destination.
    pub const INVALID_FLUSH_TO_ADDRESS: &str = "ForwarderManagement: Invalid flush to address";

    /// Flush requested for a forwarder this registry never created.
    pub const UNKNOWN_FORWARDER: &str = "ForwarderManagement: Unknown forwarder";

    /// Operation before the one-shot setup ran.
    pub const NOT_INITIALIZED: &str = "ForwarderManagement: Not initialized";

    /// Second call to the one-shot setup.
    pub const ALREADY_INITIALIZED: &str = "Initializable: contract is already initialized";

    /// Linear search found no match.
    pub const ELEMENT_NOT_FOUND: &str = "CustomArray: Element not found";
}

// =============================================================================
// ARRAY ERRORS
// =============================================================================

/// Errors from the membership search primitive.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ArrayError {
    /// No element of the sequence matched the target.
    #[error("CustomArray: Element not found")]
    ElementNotFound,
}

// =============================================================================
// GATEWAY ERRORS
// =============================================================================

/// Errors reported by the forwarder collaborator behind
/// [`ForwarderGateway`](crate::ports::outbound::ForwarderGateway).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// An object already lives at the derived forwarder address.
    #[error("forwarder already deployed at {0:?}")]
    AlreadyDeployed(Address),

    /// The forwarder is not known to the collaborator.
    #[error("forwarder not deployed at {0:?}")]
    NotDeployed(Address),

    /// The collaborator rejected or failed the call.
    #[error("forwarder call failed: {0}")]
    CallFailed(String),
}

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Stable classification of a [`RegistryError`], for automation that should
/// not depend on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Capability check failed.
    Unauthorized,
    /// Add on a present element.
    DuplicateEntry,
    /// Remove on an absent element.
    EntryNotFound,
    /// Factory creation against an unregistered destination.
    InvalidDestination,
    /// Setup already ran.
    AlreadyInitialized,
    /// Setup has not run.
    NotInitialized,
    /// Flush target was never created here.
    UnknownForwarder,
    /// Forwarder collaborator failed.
    Gateway,
    /// Search primitive failed.
    NotFound,
}

/// Errors returned by registry and factory operations.
///
/// Every failure is terminal and leaves registry state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not the Admin.
    #[error("ForwarderManagement: Must have ADMIN ROLE")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// Caller is not a registered flusher.
    #[error("ForwarderManagement: Must have FLUSHER ROLE")]
    NotFlusher {
        /// The rejected caller.
        caller: Address,
    },

    /// Address is already a member of the target set.
    #[error("ForwarderManagement: Address already exists")]
    DuplicateEntry {
        /// The duplicated address.
        address: Address,
    },

    /// Address is not a member of the target set.
    #[error("ForwarderManagement: Address already removed or doesnt exist")]
    EntryNotFound {
        /// The missing address.
        address: Address,
    },

    /// Destination is not a current valid flush-to address.
    #[error("ForwarderManagement: Invalid flush to address")]
    InvalidDestination {
        /// The rejected destination.
        destination: Address,
    },

    /// Forwarder was not created by this registry.
    #[error("ForwarderManagement: Unknown forwarder")]
    UnknownForwarder {
        /// The unknown forwarder address.
        forwarder: Address,
    },

    /// `initialize` was called a second time.
    #[error("Initializable: contract is already initialized")]
    AlreadyInitialized,

    /// Operation attempted before `initialize`.
    #[error("ForwarderManagement: Not initialized")]
    NotInitialized,

    /// Forwarder collaborator error.
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    /// Search primitive error.
    #[error("{0}")]
    Array(#[from] ArrayError),
}

impl RegistryError {
    /// Stable classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } | Self::NotFlusher { .. } => ErrorKind::Unauthorized,
            Self::DuplicateEntry { .. } => ErrorKind::DuplicateEntry,
            Self::EntryNotFound { .. } => ErrorKind::EntryNotFound,
            Self::InvalidDestination { .. } => ErrorKind::InvalidDestination,
            Self::UnknownForwarder { .. } => ErrorKind::UnknownForwarder,
            Self::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            Self::NotInitialized => ErrorKind::NotInitialized,
            Self::Gateway(_) => ErrorKind::Gateway,
            Self::Array(_) => ErrorKind::NotFound,
        }
    }

    /// Rejection reason exactly as callers expect to see it.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Returns true if the caller lacked the role required by the operation.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held an unparsable value.
    #[error("invalid value for {key}: {reason}")]
    InvalidEnv {
        /// Variable name.
        key: String,
        /// Parse failure.
        reason: String,
    },

    /// The broadcast channel needs room for at least one event.
    #[error("event channel capacity must be greater than zero")]
    ZeroChannelCapacity,

    /// Forwarder addresses derived from the zero address collide across
    /// deployments.
    #[error("registry address must not be the zero address")]
    ZeroRegistryAddress,
}

// =============================================================================
// TESTS
// =============================================================================
