//! # Domain Invariants
//!
//! Invariants that MUST hold for any registry state. The registry maintains
//! them by construction; these checks guard state loaded from outside.
//!
//! - INVARIANT-1: Unique Membership (no address twice in a list)
//! - INVARIANT-2: Admin Presence (initialized if and only if an admin is set)
//! - INVARIANT-3: Forwarder Derivation (each forwarder address matches its nonce)
//! - INVARIANT-4: Nonce Accounting (one record per consumed nonce)

use crate::domain::entities::AllowList;
use crate::domain::registry::RegistrySnapshot;
use crate::domain::services::compute_forwarder_address;
use crate::domain::value_objects::Address;
use std::collections::BTreeSet;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Unique Membership
///
/// Add rejects duplicates, so a well-formed list never repeats an address.
#[must_use]
pub fn check_unique_membership_invariant(members: &[Address]) -> bool {
    let mut seen = BTreeSet::new();
    members.iter().all(|member| seen.insert(*member))
}

/// INVARIANT-2: Admin Presence
///
/// The Admin role is assigned by the one-shot setup and only then.
#[must_use]
pub fn check_admin_invariant(snapshot: &RegistrySnapshot) -> bool {
    snapshot.initialized == snapshot.admin.is_some()
}

/// INVARIANT-3: Forwarder Derivation
///
/// Every recorded forwarder lives at the address derived from the registry
/// address and its creation nonce.
#[must_use]
pub fn check_forwarder_derivation_invariant(snapshot: &RegistrySnapshot) -> bool {
    snapshot.forwarders.iter().all(|record| {
        record.forwarder == compute_forwarder_address(snapshot.registry_address, record.nonce)
    })
}

/// INVARIANT-4: Nonce Accounting
///
/// Nonces `0..forwarder_nonce` each appear on exactly one record.
#[must_use]
pub fn check_nonce_invariant(snapshot: &RegistrySnapshot) -> bool {
    let nonces: BTreeSet<u64> = snapshot.forwarders.iter().map(|r| r.nonce).collect();
    nonces.len() == snapshot.forwarders.len()
        && u64::try_from(nonces.len()).is_ok_and(|n| n == snapshot.forwarder_nonce)
        && nonces.iter().all(|&n| n < snapshot.forwarder_nonce)
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(snapshot: &RegistrySnapshot) -> InvariantCheckResult {
    let mut violations = Vec::new();

    for list in AllowList::all() {
        let members = match list {
            AllowList::Flushers => snapshot.flushers.as_slice(),
            AllowList::ValidFlushToAddresses => snapshot.valid_flush_to_addresses.as_slice(),
        };
        if !check_unique_membership_invariant(members) {
            violations.push(InvariantViolation::DuplicateMember { list });
        }
    }

    if !check_admin_invariant(snapshot) {
        violations.push(InvariantViolation::AdminMismatch {
            initialized: snapshot.initialized,
        });
    }

    if !check_forwarder_derivation_invariant(snapshot) {
        violations.push(InvariantViolation::ForwarderAddressMismatch);
    }

    if !check_nonce_invariant(snapshot) {
        violations.push(InvariantViolation::NonceMismatch {
            records: snapshot.forwarders.len(),
            nonce: snapshot.forwarder_nonce,
        });
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An allow-list repeats an address.
    DuplicateMember {
        /// List holding the duplicate.
        list: AllowList,
    },
    /// Initialization flag and admin disagree.
    AdminMismatch {
        /// Value of the setup flag.
        initialized: bool,
    },
    /// A forwarder address does not match its nonce.
    ForwarderAddressMismatch,
    /// Records and nonce counter disagree.
    NonceMismatch {
        /// Number of creation records.
        records: usize,
        /// Stored creation nonce.
        nonce: u64,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateMember { list } => {
                write!(f, "duplicate member in {list:?}")
            }
            Self::AdminMismatch { initialized } => {
                write!(f, "admin presence does not match initialized={initialized}")
            }
            Self::ForwarderAddressMismatch => {
                write!(f, "forwarder address does not match its creation nonce")
            }
            Self::NonceMismatch { records, nonce } => {
                write!(f, "{records} forwarder records for nonce counter {nonce}")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
