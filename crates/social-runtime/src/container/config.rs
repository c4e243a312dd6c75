//! # Runtime Configuration
//!
//! One struct for everything the runtime wires: query bus timeouts,
//! activity limits and notification inboxes. Defaults come from each crate;
//! a JSON file (`SM_CONFIG_FILE`) and `SM_*` variables override them.

use serde::{Deserialize, Serialize};
use shared_bus::{QueryBusConfig, QueryKind};
use sm_03_activities::ActivityConfig;
use tracing::{info, warn};

use crate::error::RuntimeError;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Query bus configuration.
    pub bus: QueryBusConfig,
    /// Activity limits.
    pub activities: ActivityConfig,
    /// Notification inboxes.
    pub notifications: NotificationConfig,
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<(), RuntimeError> {
        self.bus.validate()?;
        self.activities.validate()?;
        self.notifications.validate()
    }
}

/// Notification inbox settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Entries kept per user; the oldest are dropped first.
    pub max_inbox_len: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { max_inbox_len: 100 }
    }
}

impl NotificationConfig {
    fn validate(&self) -> Result<(), RuntimeError> {
        if self.max_inbox_len == 0 {
            return Err(RuntimeError::Config("max_inbox_len cannot be 0".into()));
        }
        Ok(())
    }
}

/// Load configuration from an optional file, then the environment.
///
/// | Variable | Effect |
/// |---|---|
/// | `SM_CONFIG_FILE` | JSON file deserialized over the defaults |
/// | `SM_QUERY_TIMEOUT_MS` | default query timeout |
/// | `SM_<KIND>_TIMEOUT_MS` | per-kind timeout, e.g. `SM_SEARCH_USERS_TIMEOUT_MS` |
/// | `SM_CHANNEL_CAPACITY` | per-channel buffer |
/// | `SM_SWEEP_INTERVAL_MS` | janitor interval |
/// | `SM_MAX_INBOX_LEN` | notification inbox size |
pub fn load_config() -> Result<RuntimeConfig, RuntimeError> {
    let mut config = match std::env::var("SM_CONFIG_FILE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path).map_err(|e| RuntimeError::ConfigFile {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            let config = serde_json::from_str(&raw).map_err(|e| RuntimeError::ConfigFile {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            info!(path = %path, "Loaded configuration file");
            config
        }
        Err(_) => RuntimeConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Apply `SM_*` overrides read through `lookup`.
pub(crate) fn apply_env(config: &mut RuntimeConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(ms) = parse_var::<u64>(&lookup, "SM_QUERY_TIMEOUT_MS") {
        config.bus.default_timeout_ms = ms;
    }
    for kind in QueryKind::ALL {
        let key = format!("SM_{}_TIMEOUT_MS", kind.as_str().to_ascii_uppercase());
        if let Some(ms) = parse_var::<u64>(&lookup, &key) {
            config.bus.timeout_overrides_ms.insert(kind, ms);
        }
    }
    if let Some(capacity) = parse_var(&lookup, "SM_CHANNEL_CAPACITY") {
        config.bus.channel_capacity = capacity;
    }
    if let Some(ms) = parse_var(&lookup, "SM_SWEEP_INTERVAL_MS") {
        config.bus.sweep_interval_ms = ms;
    }
    if let Some(len) = parse_var(&lookup, "SM_MAX_INBOX_LEN") {
        config.notifications.max_inbox_len = len;
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}
