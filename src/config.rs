//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial capacity of the property-set map
    pub initial_capacity: usize,
    /// Maximum number of dissolution signals drained on each cache access
    pub sweep_batch: usize,
    /// Background sweep interval in milliseconds
    pub sweep_interval_ms: u64,
    /// Namespace prefix prepended to a factory identifier to form its
    /// discovery resource path
    pub service_prefix: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `EL_CACHE_INITIAL_CAPACITY` - Initial property map capacity (default: 1024)
    /// - `EL_CACHE_SWEEP_BATCH` - Signals drained per access (default: 64)
    /// - `EL_CACHE_SWEEP_INTERVAL_MS` - Background sweep interval (default: 1000)
    /// - `EL_CACHE_SERVICE_PREFIX` - Discovery prefix (default: `META-INF/services/`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_capacity: env::var("EL_CACHE_INITIAL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.initial_capacity),
            sweep_batch: env::var("EL_CACHE_SWEEP_BATCH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_batch),
            sweep_interval_ms: env::var("EL_CACHE_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval_ms),
            service_prefix: env::var("EL_CACHE_SERVICE_PREFIX")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.service_prefix),
        }
    }

    /// Background sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            sweep_batch: 64,
            sweep_interval_ms: 1000,
            service_prefix: "META-INF/services/".to_string(),
        }
    }
}
