//! # Membership Set
//!
//! Duplicate-free ordered address list backing the flusher and flush-to
//! allow-lists. Appends keep insertion order; removal swaps the last
//! element into the freed slot.

use crate::domain::custom_array::find_index;
use crate::domain::value_objects::Address;
use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};

/// An ordered sequence of addresses in which no address appears twice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipSet {
    entries: Vec<Address>,
}

impl MembershipSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `address`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateEntry`] if already present.
    pub fn insert(&mut self, address: Address) -> Result<(), RegistryError> {
        if self.contains(&address) {
            return Err(RegistryError::DuplicateEntry { address });
        }
        self.entries.push(address);
        Ok(())
    }

    /// Removes `address`, moving the last entry into its slot.
    ///
    /// # Errors
    ///
    /// [`RegistryError::EntryNotFound`] if absent.
    pub fn remove(&mut self, address: &Address) -> Result<(), RegistryError> {
        let index = find_index(&self.entries, address)
            .map_err(|_| RegistryError::EntryNotFound { address: *address })?;
        self.entries.swap_remove(index);
        Ok(())
    }

    /// Returns true if `address` is a member.
    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        find_index(&self.entries, address).is_ok()
    }

    /// Position of `address` in the backing sequence.
    #[must_use]
    pub fn position(&self, address: &Address) -> Option<usize> {
        find_index(&self.entries, address).ok()
    }

    /// Members in storage order.
    #[must_use]
    pub fn as_slice(&self) -> &[Address] {
        &self.entries
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over members in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.entries.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
