//! # Registry Configuration
//!
//! All values have defaults suitable for a local development chain and can
//! be overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `FM_REGISTRY_ADDRESS` | `registry_address` (hex) |
//! | `FM_EVENT_CHANNEL_CAPACITY` | `event_channel_capacity` |
//! | `FM_ENABLE_TRACING` | `enable_tracing` (`1`/`true`) |

use crate::domain::value_objects::Address;
use crate::errors::ConfigError;

/// Address of the first contract deployed by the default development
/// account on a fresh local chain.
pub const DEFAULT_REGISTRY_ADDRESS: Address = Address([
    0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f, 0x64,
    0x2f, 0x64, 0x18, 0x0a, 0xa3,
]);

/// Registry service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Identity of the registry; forwarder addresses derive from it.
    pub registry_address: Address,
    /// Capacity of the broadcast channel used by event subscribers.
    pub event_channel_capacity: usize,
    /// Write every committed event to the `tracing` log.
    pub enable_tracing: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_address: DEFAULT_REGISTRY_ADDRESS,
            event_channel_capacity: 1024,
            enable_tracing: true,
        }
    }
}

impl RegistryConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the registry address is zero or the channel
    /// capacity is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry_address.is_zero() {
            return Err(ConfigError::ZeroRegistryAddress);
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        Ok(())
    }

    /// Load from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a variable is set but unparsable, or the resulting
    /// configuration fails [`Self::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("FM_REGISTRY_ADDRESS") {
            config.registry_address = val.trim().parse().map_err(|e| ConfigError::InvalidEnv {
                key: "FM_REGISTRY_ADDRESS".to_string(),
                reason: format!("{e}"),
            })?;
        }

        if let Some(val) = lookup("FM_EVENT_CHANNEL_CAPACITY") {
            config.event_channel_capacity =
                val.trim().parse().map_err(|e| ConfigError::InvalidEnv {
                    key: "FM_EVENT_CHANNEL_CAPACITY".to_string(),
                    reason: format!("{e}"),
                })?;
        }

        if let Some(val) = lookup("FM_ENABLE_TRACING") {
            let val = val.trim();
            config.enable_tracing = val == "1" || val.eq_ignore_ascii_case("true");
        }

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// TESTS
// =============================================================================
