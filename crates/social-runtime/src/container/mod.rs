//! # Module Container
//!
//! Configuration plus the wired module instances.

pub mod config;
pub mod modules;

pub use config::{load_config, NotificationConfig, RuntimeConfig};
pub use modules::{
    ConcreteActivityService, ConcreteSocialService, ConcreteUserService, ModuleContainer,
};
