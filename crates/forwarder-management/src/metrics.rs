//! # Registry Metrics
//!
//! Prometheus metrics for monitoring the registry.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! forwarder-management = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `forwarder_management_mutations_total` - Committed allow-list changes (by event)
//! - `forwarder_management_rejections_total` - Rejected calls (by reason kind)
//! - `forwarder_management_forwarders_created_total` - Forwarders created
//! - `forwarder_management_flushes_total` - Forwarder flushes triggered

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Committed allow-list changes, labeled by event name
    pub static ref MUTATIONS: IntCounterVec = register_int_counter_vec!(
        "forwarder_management_mutations_total",
        "Total number of committed allow-list changes",
        &["event"]
    )
    .expect("Failed to create MUTATIONS metric");

    /// Rejected calls, labeled by error kind
    pub static ref REJECTIONS: IntCounterVec = register_int_counter_vec!(
        "forwarder_management_rejections_total",
        "Total number of rejected registry calls",
        &["kind"]
    )
    .expect("Failed to create REJECTIONS metric");

    /// Forwarders created
    pub static ref FORWARDERS_CREATED: IntCounter = register_int_counter!(
        "forwarder_management_forwarders_created_total",
        "Total number of forwarders created"
    )
    .expect("Failed to create FORWARDERS_CREATED metric");

    /// Flushes triggered
    pub static ref FLUSHES: IntCounter = register_int_counter!(
        "forwarder_management_flushes_total",
        "Total number of forwarder flushes triggered"
    )
    .expect("Failed to create FLUSHES metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a committed allow-list change
#[cfg(feature = "metrics")]
pub fn record_mutation(event: &str) {
    MUTATIONS.with_label_values(&[event]).inc();
}

/// Record a rejected call
#[cfg(feature = "metrics")]
pub fn record_rejection(kind: &str) {
    REJECTIONS.with_label_values(&[kind]).inc();
}

/// Record a forwarder creation
#[cfg(feature = "metrics")]
pub fn record_forwarder_created() {
    FORWARDERS_CREATED.inc();
}

/// Record a flush
#[cfg(feature = "metrics")]
pub fn record_flush() {
    FLUSHES.inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

/// Record a committed registry event (no-op).
#[cfg(not(feature = "metrics"))]
pub fn record_mutation(_event: &str) {}

/// Record a rejected call (no-op).
#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_kind: &str) {}

/// Record a forwarder creation (no-op).
#[cfg(not(feature = "metrics"))]
pub fn record_forwarder_created() {}

/// Record a forwarder flush (no-op).
#[cfg(not(feature = "metrics"))]
pub fn record_flush() {}
