//! # SM-03 Activities
//!
//! Hosted activities with public or friends-only visibility, a participant
//! capacity and an expiry instant. Answers no queries; asks `GetUser` to
//! validate hosts and participants and `IsFriend` to enforce visibility.
//!
//! Publishes `SocialEvent::ActivityCreated` and `SocialEvent::ActivityJoined`.
//!
//! ## Wiring
//!
//! ```ignore
//! let service = ActivityService::new(
//!     Arc::new(InMemoryActivityRepository::new()),
//!     Arc::new(BusUserDirectory::new(&queries)),
//!     Arc::new(BusFriendGraph::new(&queries)),
//!     events,
//!     ActivityConfig::default(),
//! );
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{BusFriendGraph, BusUserDirectory, InMemoryActivityRepository};
pub use domain::{Activity, ActivityConfig, NewActivity};
pub use error::ActivityError;
pub use ports::{ActivityApi, ActivityRepository, FriendGraph, UserDirectory};
pub use service::ActivityService;
