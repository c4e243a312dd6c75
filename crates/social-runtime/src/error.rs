//! Runtime errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Invalid query bus configuration: {0}")]
    QueryBus(#[from] shared_bus::query::ConfigError),

    #[error("Invalid activity configuration: {0}")]
    Activities(#[from] sm_03_activities::ActivityError),

    #[error("Invalid runtime configuration: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {reason}")]
    ConfigFile { path: String, reason: String },

    #[error("Runtime already started")]
    AlreadyStarted,
}
