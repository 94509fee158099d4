//! # In-Memory Forwarder Gateway
//!
//! Ledger-backed stand-in for deployed forwarder objects. Each forwarder
//! holds a balance that can be credited by anyone and flushed only to the
//! destination it was deployed with.

use crate::domain::entities::ForwarderRecord;
use crate::domain::value_objects::{Address, U256};
use crate::errors::GatewayError;
use crate::ports::outbound::ForwarderGateway;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

#[derive(Debug, Default)]
struct Ledger {
    /// forwarder -> bound destination
    deployed: HashMap<Address, Address>,
    /// forwarder -> held balance
    balances: HashMap<Address, U256>,
    /// destination -> total received through flushes
    delivered: HashMap<Address, U256>,
}

/// In-memory [`ForwarderGateway`].
#[derive(Debug, Default)]
pub struct InMemoryForwarderGateway {
    ledger: Mutex<Ledger>,
    fail_next_deploy: AtomicBool,
}

impl InMemoryForwarderGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `deploy` call fail with [`GatewayError::CallFailed`].
    pub fn fail_next_deploy(&self) {
        self.fail_next_deploy.store(true, Ordering::SeqCst);
    }

    /// Send `amount` to `forwarder`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotDeployed`] if nothing lives at `forwarder`.
    pub fn credit(&self, forwarder: Address, amount: U256) -> Result<(), GatewayError> {
        let mut ledger = self.ledger.lock();
        if !ledger.deployed.contains_key(&forwarder) {
            return Err(GatewayError::NotDeployed(forwarder));
        }
        let balance = ledger.balances.entry(forwarder).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }

    /// Returns true if a forwarder lives at `forwarder`.
    #[must_use]
    pub fn is_deployed(&self, forwarder: &Address) -> bool {
        self.ledger.lock().deployed.contains_key(forwarder)
    }

    /// Destination `forwarder` was deployed with.
    #[must_use]
    pub fn destination_of(&self, forwarder: &Address) -> Option<Address> {
        self.ledger.lock().deployed.get(forwarder).copied()
    }

    /// Balance currently held by `forwarder`.
    #[must_use]
    pub fn balance_of(&self, forwarder: &Address) -> U256 {
        self.ledger
            .lock()
            .balances
            .get(forwarder)
            .copied()
            .unwrap_or_default()
    }

    /// Total flushed into `destination` so far.
    #[must_use]
    pub fn delivered_to(&self, destination: &Address) -> U256 {
        self.ledger
            .lock()
            .delivered
            .get(destination)
            .copied()
            .unwrap_or_default()
    }

    /// Number of deployed forwarders.
    #[must_use]
    pub fn deployed_count(&self) -> usize {
        self.ledger.lock().deployed.len()
    }
}

#[async_trait]
impl ForwarderGateway for InMemoryForwarderGateway {
    async fn deploy(&self, record: &ForwarderRecord) -> Result<(), GatewayError> {
        if self.fail_next_deploy.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::CallFailed("deployment reverted".to_string()));
        }

        let mut ledger = self.ledger.lock();
        if ledger.deployed.contains_key(&record.forwarder) {
            return Err(GatewayError::AlreadyDeployed(record.forwarder));
        }
        ledger.deployed.insert(record.forwarder, record.destination);
        debug!(forwarder = ?record.forwarder, destination = ?record.destination, "Forwarder deployed");
        Ok(())
    }

    async fn flush(&self, forwarder: Address, destination: Address) -> Result<U256, GatewayError> {
        let mut ledger = self.ledger.lock();
        let bound = *ledger
            .deployed
            .get(&forwarder)
            .ok_or(GatewayError::NotDeployed(forwarder))?;
        if bound != destination {
            return Err(GatewayError::CallFailed(format!(
                "forwarder {forwarder:?} is bound to {bound:?}"
            )));
        }

        // Zero the source before crediting the destination
        let amount = ledger.balances.remove(&forwarder).unwrap_or_default();
        let received = ledger.delivered.entry(destination).or_default();
        *received = received.saturating_add(amount);

        debug!(forwarder = ?forwarder, amount = %amount, "Forwarder flushed");
        Ok(amount)
    }
}

// =============================================================================
// TESTS
// =============================================================================
