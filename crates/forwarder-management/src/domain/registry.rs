//! # Forwarder Management Registry
//!
//! The synchronous state machine behind the service: two admin-gated
//! allow-lists and the forwarder factory.
//!
//! Every mutating method checks all of its preconditions before it touches
//! state, so an `Err` return leaves the registry exactly as it was. Methods
//! return the events they produced; publishing them is the caller's job.

use crate::domain::entities::{AllowList, ForwarderRecord, RegistryEvent, Role};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::membership::MembershipSet;
use crate::domain::services::compute_forwarder_address;
use crate::domain::value_objects::Address;
use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registry state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwarderManagement {
    /// Identity of the registry itself; forwarder addresses derive from it.
    registry_address: Address,
    /// Holder of the Admin role.
    admin: Option<Address>,
    /// Set once by `initialize`.
    initialized: bool,
    flushers: MembershipSet,
    valid_flush_to_addresses: MembershipSet,
    forwarders: BTreeMap<Address, ForwarderRecord>,
    /// Next creation nonce.
    forwarder_nonce: u64,
}

impl ForwarderManagement {
    /// Creates an uninitialized registry living at `registry_address`.
    #[must_use]
    pub fn new(registry_address: Address) -> Self {
        Self {
            registry_address,
            admin: None,
            initialized: false,
            flushers: MembershipSet::new(),
            valid_flush_to_addresses: MembershipSet::new(),
            forwarders: BTreeMap::new(),
            forwarder_nonce: 0,
        }
    }

    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// One-shot setup: installs `admin` and the first valid flush-to address.
    ///
    /// # Errors
    ///
    /// [`RegistryError::AlreadyInitialized`] on any call after the first
    /// successful one.
    pub fn initialize(
        &mut self,
        admin: Address,
        flush_to_address: Address,
    ) -> Result<Vec<RegistryEvent>, RegistryError> {
        if self.initialized {
            return Err(RegistryError::AlreadyInitialized);
        }

        // Fresh registry: the destination list is empty, insert cannot fail
        self.valid_flush_to_addresses.insert(flush_to_address)?;
        self.admin = Some(admin);
        self.initialized = true;

        Ok(vec![
            RegistryEvent::AddFlushToAddress {
                address: flush_to_address,
            },
            RegistryEvent::Initialized { admin },
        ])
    }

    /// Returns true once `initialize` has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // =========================================================================
    // ROLE CHECKS
    // =========================================================================

    /// Returns true if `account` holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        match role {
            Role::Admin => self.admin.as_ref() == Some(account),
            Role::Flusher => self.flushers.contains(account),
        }
    }

    fn ensure_initialized(&self) -> Result<(), RegistryError> {
        if self.initialized {
            Ok(())
        } else {
            Err(RegistryError::NotInitialized)
        }
    }

    fn ensure_admin(&self, caller: &Address) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        if self.has_role(Role::Admin, caller) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized { caller: *caller })
        }
    }

    // =========================================================================
    // FLUSHERS
    // =========================================================================

    /// Authorizes `address` as a flusher.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if `caller` is not Admin
    /// - [`RegistryError::DuplicateEntry`] if already a flusher
    pub fn add_flusher(
        &mut self,
        caller: &Address,
        address: Address,
    ) -> Result<RegistryEvent, RegistryError> {
        self.ensure_admin(caller)?;
        self.flushers.insert(address)?;
        Ok(RegistryEvent::AddFlusher { address })
    }

    /// Revokes `address` as a flusher.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if `caller` is not Admin
    /// - [`RegistryError::EntryNotFound`] if not a flusher
    pub fn remove_flusher(
        &mut self,
        caller: &Address,
        address: Address,
    ) -> Result<RegistryEvent, RegistryError> {
        self.ensure_admin(caller)?;
        self.flushers.remove(&address)?;
        Ok(RegistryEvent::RemoveFlusher { address })
    }

    /// Returns true if `address` is a flusher.
    #[must_use]
    pub fn is_flusher(&self, address: &Address) -> bool {
        self.flushers.contains(address)
    }

    // =========================================================================
    // VALID FLUSH-TO ADDRESSES
    // =========================================================================

    /// Allows `address` as a forwarder destination.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if `caller` is not Admin
    /// - [`RegistryError::DuplicateEntry`] if already valid
    pub fn add_valid_flush_to_address(
        &mut self,
        caller: &Address,
        address: Address,
    ) -> Result<RegistryEvent, RegistryError> {
        self.ensure_admin(caller)?;
        self.valid_flush_to_addresses.insert(address)?;
        Ok(RegistryEvent::AddFlushToAddress { address })
    }

    /// Disallows `address` as a destination for new forwarders.
    ///
    /// Forwarders already bound to it keep their binding.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if `caller` is not Admin
    /// - [`RegistryError::EntryNotFound`] if not currently valid
    pub fn remove_valid_flush_to_address(
        &mut self,
        caller: &Address,
        address: Address,
    ) -> Result<RegistryEvent, RegistryError> {
        self.ensure_admin(caller)?;
        self.valid_flush_to_addresses.remove(&address)?;
        Ok(RegistryEvent::RemoveFlushToAddress { address })
    }

    /// Returns true if `address` may be bound to a new forwarder.
    #[must_use]
    pub fn is_valid_flush_to_address(&self, address: &Address) -> bool {
        self.valid_flush_to_addresses.contains(address)
    }

    // =========================================================================
    // FORWARDER FACTORY
    // =========================================================================

    /// Validates a creation request and computes the record it would commit.
    ///
    /// Does not mutate state. The returned record carries the address the
    /// forwarder will live at.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotInitialized`] before setup
    /// - [`RegistryError::InvalidDestination`] if `destination` is not a
    ///   current valid flush-to address
    pub fn prepare_forwarder(
        &self,
        creator: &Address,
        destination: Address,
    ) -> Result<ForwarderRecord, RegistryError> {
        self.ensure_initialized()?;
        if !self.is_valid_flush_to_address(&destination) {
            return Err(RegistryError::InvalidDestination { destination });
        }

        let nonce = self.forwarder_nonce;
        Ok(ForwarderRecord {
            forwarder: compute_forwarder_address(self.registry_address, nonce),
            destination,
            creator: *creator,
            nonce,
        })
    }

    /// Records a forwarder produced by [`Self::prepare_forwarder`].
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidDestination`] if the record is stale: its
    /// nonce was already consumed or its destination is no longer valid.
    pub fn commit_forwarder(
        &mut self,
        record: ForwarderRecord,
    ) -> Result<RegistryEvent, RegistryError> {
        let expected = self.prepare_forwarder(&record.creator, record.destination)?;
        if expected != record {
            return Err(RegistryError::InvalidDestination {
                destination: record.destination,
            });
        }

        self.forwarders.insert(record.forwarder, record);
        self.forwarder_nonce += 1;

        Ok(RegistryEvent::ForwarderCreated {
            creator: record.creator,
            forwarder: record.forwarder,
        })
    }

    /// Creates a forwarder bound to `destination`.
    ///
    /// Repeated calls with the same destination yield distinct forwarders.
    ///
    /// # Errors
    ///
    /// Same as [`Self::prepare_forwarder`].
    pub fn create_forwarder(
        &mut self,
        creator: &Address,
        destination: Address,
    ) -> Result<(ForwarderRecord, RegistryEvent), RegistryError> {
        let record = self.prepare_forwarder(creator, destination)?;
        let event = self.commit_forwarder(record)?;
        Ok((record, event))
    }

    /// Address the next successful creation will produce.
    #[must_use]
    pub fn preview_forwarder_address(&self) -> Address {
        compute_forwarder_address(self.registry_address, self.forwarder_nonce)
    }

    /// Checks that `caller` may flush `forwarder` and returns its record.
    ///
    /// The recorded destination is returned even if it has since been
    /// removed from the valid flush-to list.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotInitialized`] before setup
    /// - [`RegistryError::NotFlusher`] if `caller` is not a flusher
    /// - [`RegistryError::UnknownForwarder`] if this registry did not
    ///   create `forwarder`
    pub fn authorize_flush(
        &self,
        caller: &Address,
        forwarder: &Address,
    ) -> Result<ForwarderRecord, RegistryError> {
        self.ensure_initialized()?;
        if !self.has_role(Role::Flusher, caller) {
            return Err(RegistryError::NotFlusher { caller: *caller });
        }
        self.forwarders
            .get(forwarder)
            .copied()
            .ok_or(RegistryError::UnknownForwarder {
                forwarder: *forwarder,
            })
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Address of the registry itself.
    #[must_use]
    pub fn registry_address(&self) -> Address {
        self.registry_address
    }

    /// Current Admin, if initialized.
    #[must_use]
    pub fn admin(&self) -> Option<Address> {
        self.admin
    }

    /// Members of `list` in storage order.
    #[must_use]
    pub fn members(&self, list: AllowList) -> &[Address] {
        match list {
            AllowList::Flushers => self.flushers.as_slice(),
            AllowList::ValidFlushToAddresses => self.valid_flush_to_addresses.as_slice(),
        }
    }

    /// Current flushers in storage order.
    #[must_use]
    pub fn flushers(&self) -> &[Address] {
        self.members(AllowList::Flushers)
    }

    /// Current valid flush-to addresses in storage order.
    #[must_use]
    pub fn valid_flush_to_addresses(&self) -> &[Address] {
        self.members(AllowList::ValidFlushToAddresses)
    }

    /// Creation record of `forwarder`.
    #[must_use]
    pub fn forwarder(&self, forwarder: &Address) -> Option<&ForwarderRecord> {
        self.forwarders.get(forwarder)
    }

    /// All creation records, ordered by forwarder address.
    pub fn forwarders(&self) -> impl Iterator<Item = &ForwarderRecord> {
        self.forwarders.values()
    }

    /// Number of forwarders created so far.
    #[must_use]
    pub fn forwarder_count(&self) -> u64 {
        self.forwarder_nonce
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Durable form of the registry.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut forwarders: Vec<ForwarderRecord> = self.forwarders.values().copied().collect();
        forwarders.sort_by_key(|record| record.nonce);

        RegistrySnapshot {
            registry_address: self.registry_address,
            admin: self.admin,
            initialized: self.initialized,
            flushers: self.flushers.clone(),
            valid_flush_to_addresses: self.valid_flush_to_addresses.clone(),
            forwarders,
            forwarder_nonce: self.forwarder_nonce,
        }
    }

    /// Rebuilds a registry from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns the violated invariants if the snapshot is inconsistent.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self, InvariantCheckResult> {
        let check = check_all_invariants(&snapshot);
        if !check.is_valid() {
            return Err(check);
        }

        Ok(Self {
            registry_address: snapshot.registry_address,
            admin: snapshot.admin,
            initialized: snapshot.initialized,
            flushers: snapshot.flushers,
            valid_flush_to_addresses: snapshot.valid_flush_to_addresses,
            forwarders: snapshot
                .forwarders
                .into_iter()
                .map(|record| (record.forwarder, record))
                .collect(),
            forwarder_nonce: snapshot.forwarder_nonce,
        })
    }
}

/// Serializable registry state: two address sequences, the admin identity,
/// the creation records and the creation nonce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Identity of the registry itself.
    pub registry_address: Address,
    /// Holder of the Admin role.
    pub admin: Option<Address>,
    /// One-shot setup flag.
    pub initialized: bool,
    /// Flusher allow-list.
    pub flushers: MembershipSet,
    /// Destination allow-list.
    pub valid_flush_to_addresses: MembershipSet,
    /// Creation records, ordered by nonce.
    pub forwarders: Vec<ForwarderRecord>,
    /// Next creation nonce.
    pub forwarder_nonce: u64,
}

// =============================================================================
// TESTS
// =============================================================================
