//! Query bus configuration with validation.

use crate::query::error::ConfigError;
use crate::query::message::QueryKind;
use crate::DEFAULT_CHANNEL_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default wait before a query falls back.
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 3_000;

/// Default interval between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 30_000;

/// Configuration shared by every query lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryBusConfig {
    /// Timeout for kinds without an override.
    pub default_timeout_ms: u64,
    /// Per-kind timeout overrides.
    pub timeout_overrides_ms: HashMap<QueryKind, u64>,
    /// Buffered messages per request/response channel.
    pub channel_capacity: usize,
    /// How often the runtime sweeps expired registry entries.
    pub sweep_interval_ms: u64,
}

impl Default for QueryBusConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
            timeout_overrides_ms: HashMap::new(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

impl QueryBusConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(
                "default_timeout_ms cannot be 0".into(),
            ));
        }

        if let Some((kind, _)) = self.timeout_overrides_ms.iter().find(|(_, ms)| **ms == 0) {
            return Err(ConfigError::InvalidTimeout(format!(
                "timeout override for {kind} cannot be 0"
            )));
        }

        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidLimit(
                "channel_capacity cannot be 0".into(),
            ));
        }

        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::InvalidLimit(
                "sweep_interval_ms cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Effective timeout for `kind`.
    pub fn timeout_for(&self, kind: QueryKind) -> Duration {
        let ms = self
            .timeout_overrides_ms
            .get(&kind)
            .copied()
            .unwrap_or(self.default_timeout_ms);
        Duration::from_millis(ms)
    }

    /// Interval for the expiry sweep.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Builder-style override for one kind.
    #[must_use]
    pub fn with_timeout(mut self, kind: QueryKind, timeout: Duration) -> Self {
        self.timeout_overrides_ms.insert(kind, whole_millis(timeout));
        self
    }

    /// Builder-style default timeout.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_ms = whole_millis(timeout);
        self
    }
}

/// Milliseconds for a configured duration: saturating, and never 0 unless
/// the duration itself is zero.
fn whole_millis(timeout: Duration) -> u64 {
    if timeout.is_zero() {
        return 0;
    }
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1)
}
