//! # Driving Ports (API - Inbound)
//!
//! The interface exposed by the registry. Every method takes the caller
//! explicitly; the registry never infers identity from anywhere else.

use crate::domain::custom_array;
use crate::domain::value_objects::{Address, U256};
use crate::errors::{ArrayError, RegistryError};
use async_trait::async_trait;

/// Primary API of the forwarder registry.
///
/// ## Usage
///
/// ```ignore
/// api.add_valid_flush_to_address(admin, destination).await?;
/// let forwarder = api.create_forwarder(admin, destination).await?;
/// ```
#[async_trait]
pub trait ForwarderManagementApi: Send + Sync {
    /// One-shot setup installing the Admin and the first valid flush-to
    /// address.
    async fn initialize(
        &self,
        admin: Address,
        flush_to_address: Address,
    ) -> Result<(), RegistryError>;

    /// Admin only: authorize `address` as a flusher.
    async fn add_flusher(&self, caller: Address, address: Address) -> Result<(), RegistryError>;

    /// Admin only: revoke `address` as a flusher.
    async fn remove_flusher(&self, caller: Address, address: Address)
        -> Result<(), RegistryError>;

    /// Returns true if `address` is a flusher. Never fails.
    async fn is_flusher(&self, address: Address) -> bool;

    /// Admin only: allow `address` as a forwarder destination.
    async fn add_valid_flush_to_address(
        &self,
        caller: Address,
        address: Address,
    ) -> Result<(), RegistryError>;

    /// Admin only: disallow `address` as a destination for new forwarders.
    async fn remove_valid_flush_to_address(
        &self,
        caller: Address,
        address: Address,
    ) -> Result<(), RegistryError>;

    /// Returns true if `address` is a valid flush-to address. Never fails.
    async fn is_valid_flush_to_address(&self, address: Address) -> bool;

    /// Creates a forwarder bound to `destination` and returns its address.
    async fn create_forwarder(
        &self,
        caller: Address,
        destination: Address,
    ) -> Result<Address, RegistryError>;

    /// Flusher only: moves everything held by `forwarder` to its bound
    /// destination and returns the amount moved.
    async fn flush_forwarder_tokens(
        &self,
        caller: Address,
        forwarder: Address,
    ) -> Result<U256, RegistryError>;

    /// Index of the first occurrence of `target` in `sequence`.
    ///
    /// Pure; does not read registry state.
    fn find_index(&self, sequence: &[Address], target: &Address) -> Result<usize, ArrayError> {
        custom_array::find_index(sequence, target)
    }
}
