//! # Domain Services
//!
//! Pure functions used by the forwarder factory.
//!
//! - NO I/O operations
//! - NO async code

use crate::domain::value_objects::{Address, Hash};
use rlp::RlpStream;
use sha3::{Digest, Keccak256};

// =============================================================================
// FORWARDER ADDRESS DERIVATION
// =============================================================================

/// Computes the address of the forwarder created by `factory` at `nonce`.
///
/// Address = keccak256(rlp(\[factory, nonce\]))\[12:\]
///
/// This is the CREATE rule: the registry plays the role of the deploying
/// account and the creation nonce plays the role of its account nonce.
#[must_use]
pub fn compute_forwarder_address(factory: Address, nonce: u64) -> Address {
    let mut stream = RlpStream::new_list(2);
    stream.append(&factory.as_bytes().as_slice());
    stream.append(&nonce);

    let hash = Keccak256::digest(stream.as_raw());
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::new(addr)
}

// =============================================================================
// KECCAK256 UTILITY
// =============================================================================

/// Computes keccak256 hash of data.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let hash = Keccak256::digest(data);
    Hash::new(hash.into())
}

/// Event signature topic, `keccak256("Name(types)")`.
#[must_use]
pub fn event_signature(signature: &str) -> Hash {
    keccak256(signature.as_bytes())
}

// =============================================================================
// TESTS
// =============================================================================
