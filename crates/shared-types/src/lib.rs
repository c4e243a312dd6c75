//! # Shared Types Crate
//!
//! Entities and identifiers that cross module boundaries.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every type carried inside a bus message is
//!   defined here, so module crates never need to depend on each other.
//! - **Summaries, not aggregates**: Modules exchange `UserSummary`, never the
//!   full user aggregate owned by the User module.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
