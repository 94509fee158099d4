//! # Forwarder Management Service
//!
//! Async service that owns the registry, serializes every mutation behind
//! one write lock, drives the forwarder gateway and publishes committed
//! events to the configured sinks.
//!
//! ## Ordering
//!
//! - Preconditions are checked by the domain before anything changes
//! - Creation deploys through the gateway before the record is committed
//! - Events are published while the write lock is still held, so sinks
//!   observe them in commit order
//! - Gateway calls and their commit run on a spawned task; dropping the
//!   caller's future does not abandon a deployment half-way

use crate::adapters::{BroadcastEventSink, InMemoryForwarderGateway, TracingEventSink};
use crate::config::RegistryConfig;
use crate::domain::entities::{ForwarderRecord, RegistryEvent};
use crate::domain::invariants::InvariantCheckResult;
use crate::domain::registry::{ForwarderManagement, RegistrySnapshot};
use crate::domain::value_objects::{Address, U256};
use crate::errors::{GatewayError, RegistryError};
use crate::events::EventEnvelope;
use crate::metrics;
use crate::ports::inbound::ForwarderManagementApi;
use crate::ports::outbound::{EventSink, ForwarderGateway};

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn, Instrument};
use uuid::Uuid;

/// Statistics for the registry service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Committed calls that changed registry state.
    pub mutations_applied: u64,
    /// Calls rejected by a precondition or the gateway.
    pub rejected_calls: u64,
    /// Forwarders created.
    pub forwarders_created: u64,
    /// Flushes triggered.
    pub flushes: u64,
}

/// Sinks plus the sequence counter, shareable with spawned tasks.
#[derive(Clone)]
struct EventPublisher {
    sinks: Arc<Vec<Arc<dyn EventSink>>>,
    next_sequence: Arc<AtomicU64>,
}

impl EventPublisher {
    /// Wrap and deliver committed events. Caller holds the write lock.
    fn publish(&self, correlation_id: Uuid, registry: Address, events: &[RegistryEvent]) {
        for event in events {
            let envelope = EventEnvelope {
                correlation_id,
                sequence: self.next_sequence.fetch_add(1, Ordering::SeqCst),
                registry,
                event: event.clone(),
            };
            for sink in self.sinks.iter() {
                sink.publish(&envelope);
            }
            metrics::record_mutation(event.name());
        }
    }
}

/// The registry service.
pub struct ForwarderManagementService<G: ForwarderGateway> {
    config: RegistryConfig,
    registry: Arc<RwLock<ForwarderManagement>>,
    gateway: Arc<G>,
    publisher: EventPublisher,
    broadcast: BroadcastEventSink,
    stats: Arc<RwLock<ServiceStats>>,
}

impl<G: ForwarderGateway> ForwarderManagementService<G> {
    /// Create a service around a fresh, uninitialized registry.
    pub fn new(config: RegistryConfig, gateway: G) -> Self {
        let registry = ForwarderManagement::new(config.registry_address);
        Self::with_registry(config, gateway, registry)
    }

    /// Create a service around a registry restored from `snapshot`.
    ///
    /// The snapshot's registry address takes precedence over the config.
    ///
    /// # Errors
    ///
    /// Returns the violated invariants if the snapshot is inconsistent.
    pub fn from_snapshot(
        config: RegistryConfig,
        gateway: G,
        snapshot: RegistrySnapshot,
    ) -> Result<Self, InvariantCheckResult> {
        let registry = ForwarderManagement::from_snapshot(snapshot)?;
        Ok(Self::with_registry(config, gateway, registry))
    }

    fn with_registry(config: RegistryConfig, gateway: G, registry: ForwarderManagement) -> Self {
        // tokio rejects zero-capacity channels
        let broadcast = BroadcastEventSink::new(config.event_channel_capacity.max(1));

        let mut sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(broadcast.clone())];
        if config.enable_tracing {
            sinks.push(Arc::new(TracingEventSink));
        }

        Self {
            config,
            registry: Arc::new(RwLock::new(registry)),
            gateway: Arc::new(gateway),
            publisher: EventPublisher {
                sinks: Arc::new(sinks),
                next_sequence: Arc::new(AtomicU64::new(0)),
            },
            broadcast,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Attach an additional event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        Arc::make_mut(&mut self.publisher.sinks).push(sink);
        self
    }

    /// Subscribe to events committed from now on.
    ///
    /// The channel holds `event_channel_capacity` undelivered events per
    /// subscriber; a subscriber that falls further behind sees
    /// [`broadcast::error::RecvError::Lagged`].
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.broadcast.subscribe()
    }

    /// Service configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The forwarder gateway this service drives.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Address of the registry.
    pub async fn registry_address(&self) -> Address {
        self.registry.read().await.registry_address()
    }

    /// Current Admin, if initialized.
    pub async fn admin(&self) -> Option<Address> {
        self.registry.read().await.admin()
    }

    /// Current flushers, in storage order.
    pub async fn flushers(&self) -> Vec<Address> {
        self.registry.read().await.flushers().to_vec()
    }

    /// Current valid flush-to addresses, in storage order.
    pub async fn valid_flush_to_addresses(&self) -> Vec<Address> {
        self.registry.read().await.valid_flush_to_addresses().to_vec()
    }

    /// Creation record of `forwarder`.
    pub async fn forwarder(&self, forwarder: Address) -> Option<ForwarderRecord> {
        self.registry.read().await.forwarder(&forwarder).copied()
    }

    /// Every creation record, in creation order.
    pub async fn forwarders(&self) -> Vec<ForwarderRecord> {
        let mut records: Vec<ForwarderRecord> =
            self.registry.read().await.forwarders().copied().collect();
        records.sort_by_key(|record| record.nonce);
        records
    }

    /// Address the next successful `create_forwarder` will return.
    pub async fn preview_forwarder_address(&self) -> Address {
        self.registry.read().await.preview_forwarder_address()
    }

    /// Durable copy of the registry state.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        self.registry.read().await.snapshot()
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    async fn reject(&self, operation: &'static str, err: RegistryError) -> RegistryError {
        record_rejection(&self.stats, operation, err).await
    }

    /// Run an allow-list mutation under the write lock.
    async fn apply<F>(&self, operation: &'static str, mutation: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut ForwarderManagement) -> Result<Vec<RegistryEvent>, RegistryError> + Send,
    {
        let correlation_id = Uuid::new_v4();
        let mut registry = self.registry.write().await;

        let events = match mutation(&mut *registry) {
            Ok(events) => events,
            Err(err) => return Err(self.reject(operation, err).await),
        };

        self.publisher
            .publish(correlation_id, registry.registry_address(), &events);
        drop(registry);

        self.stats.write().await.mutations_applied += 1;
        info!(operation, %correlation_id, events = events.len(), "Registry updated");
        Ok(())
    }
}

async fn record_rejection(
    stats: &RwLock<ServiceStats>,
    operation: &'static str,
    err: RegistryError,
) -> RegistryError {
    warn!(operation, reason = %err, kind = ?err.kind(), "Registry call rejected");
    stats.write().await.rejected_calls += 1;
    metrics::record_rejection(&format!("{:?}", err.kind()));
    err
}

/// A gateway task that panicked surfaces as a failed gateway call.
fn join_failure(err: &JoinError) -> RegistryError {
    GatewayError::CallFailed(format!("gateway task failed: {err}")).into()
}

/// Create a service with the in-memory gateway and default config (for testing).
#[must_use]
pub fn create_test_service() -> ForwarderManagementService<InMemoryForwarderGateway> {
    ForwarderManagementService::new(RegistryConfig::default(), InMemoryForwarderGateway::new())
}

// =============================================================================
// ForwarderManagementApi Implementation
// =============================================================================

#[async_trait]
impl<G: ForwarderGateway + 'static> ForwarderManagementApi for ForwarderManagementService<G> {
    #[instrument(skip(self))]
    async fn initialize(
        &self,
        admin: Address,
        flush_to_address: Address,
    ) -> Result<(), RegistryError> {
        self.apply("initialize", |r| r.initialize(admin, flush_to_address))
            .await
    }

    #[instrument(skip(self))]
    async fn add_flusher(&self, caller: Address, address: Address) -> Result<(), RegistryError> {
        self.apply("add_flusher", |r| {
            r.add_flusher(&caller, address).map(|event| vec![event])
        })
        .await
    }

    #[instrument(skip(self))]
    async fn remove_flusher(&self, caller: Address, address: Address) -> Result<(), RegistryError> {
        self.apply("remove_flusher", |r| {
            r.remove_flusher(&caller, address).map(|event| vec![event])
        })
        .await
    }

    async fn is_flusher(&self, address: Address) -> bool {
        let result = self.registry.read().await.is_flusher(&address);
        debug!(address = ?address, result, "is_flusher");
        result
    }

    #[instrument(skip(self))]
    async fn add_valid_flush_to_address(
        &self,
        caller: Address,
        address: Address,
    ) -> Result<(), RegistryError> {
        self.apply("add_valid_flush_to_address", |r| {
            r.add_valid_flush_to_address(&caller, address)
                .map(|event| vec![event])
        })
        .await
    }

    #[instrument(skip(self))]
    async fn remove_valid_flush_to_address(
        &self,
        caller: Address,
        address: Address,
    ) -> Result<(), RegistryError> {
        self.apply("remove_valid_flush_to_address", |r| {
            r.remove_valid_flush_to_address(&caller, address)
                .map(|event| vec![event])
        })
        .await
    }

    async fn is_valid_flush_to_address(&self, address: Address) -> bool {
        let result = self.registry.read().await.is_valid_flush_to_address(&address);
        debug!(address = ?address, result, "is_valid_flush_to_address");
        result
    }

    #[instrument(skip(self))]
    async fn create_forwarder(
        &self,
        caller: Address,
        destination: Address,
    ) -> Result<Address, RegistryError> {
        let correlation_id = Uuid::new_v4();
        let mut registry = Arc::clone(&self.registry).write_owned().await;

        let record = match registry.prepare_forwarder(&caller, destination) {
            Ok(record) => record,
            Err(err) => return Err(self.reject("create_forwarder", err).await),
        };

        let gateway = Arc::clone(&self.gateway);
        let publisher = self.publisher.clone();
        let stats = Arc::clone(&self.stats);

        // Owns the write guard: deploy and commit finish together even if
        // this call is dropped.
        let task = tokio::spawn(
            async move {
                // Nothing is recorded unless the forwarder actually exists
                if let Err(err) = gateway.deploy(&record).await {
                    return Err(record_rejection(&stats, "create_forwarder", err.into()).await);
                }

                let event = match registry.commit_forwarder(record) {
                    Ok(event) => event,
                    Err(err) => {
                        return Err(record_rejection(&stats, "create_forwarder", err).await)
                    }
                };
                publisher.publish(correlation_id, registry.registry_address(), &[event]);
                drop(registry);

                {
                    let mut stats = stats.write().await;
                    stats.mutations_applied += 1;
                    stats.forwarders_created += 1;
                }
                metrics::record_forwarder_created();

                info!(
                    %correlation_id,
                    forwarder = ?record.forwarder,
                    destination = ?record.destination,
                    nonce = record.nonce,
                    "Forwarder created"
                );
                Ok(record.forwarder)
            }
            .in_current_span(),
        );

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => Err(self.reject("create_forwarder", join_failure(&err)).await),
        }
    }

    #[instrument(skip(self))]
    async fn flush_forwarder_tokens(
        &self,
        caller: Address,
        forwarder: Address,
    ) -> Result<U256, RegistryError> {
        let correlation_id = Uuid::new_v4();
        let registry = Arc::clone(&self.registry).write_owned().await;

        let record = match registry.authorize_flush(&caller, &forwarder) {
            Ok(record) => record,
            Err(err) => return Err(self.reject("flush_forwarder_tokens", err).await),
        };

        let gateway = Arc::clone(&self.gateway);
        let publisher = self.publisher.clone();
        let stats = Arc::clone(&self.stats);

        // A moved balance is always announced, even if this call is dropped
        let task = tokio::spawn(
            async move {
                let amount = match gateway.flush(record.forwarder, record.destination).await {
                    Ok(amount) => amount,
                    Err(err) => {
                        return Err(
                            record_rejection(&stats, "flush_forwarder_tokens", err.into()).await,
                        )
                    }
                };

                let event = RegistryEvent::ForwarderFlushed {
                    flusher: caller,
                    forwarder: record.forwarder,
                    destination: record.destination,
                    amount,
                };
                publisher.publish(correlation_id, registry.registry_address(), &[event]);
                drop(registry);

                stats.write().await.flushes += 1;
                metrics::record_flush();

                info!(
                    %correlation_id,
                    forwarder = ?record.forwarder,
                    destination = ?record.destination,
                    amount = %amount,
                    "Forwarder flushed"
                );
                Ok(amount)
            }
            .in_current_span(),
        );

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => Err(self.reject("flush_forwarder_tokens", join_failure(&err)).await),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
