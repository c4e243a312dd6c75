//! # SM-01 Users
//!
//! User accounts, search and friend recommendations.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): `User`, search normalisation, recommendation ranking
//! - **Ports Layer** (`ports/`):
//!   - `UserApi`: Driving port
//!   - `UserRepository`, `SocialGraph`: Driven ports
//! - **Service Layer** (`service/`): `UserService` implements `UserApi`
//! - **Adapters Layer** (`adapters/`):
//!   - `InMemoryUserRepository`: storage
//!   - `BusSocialGraph`: asks the Social module over the query bus
//!   - `GetUserHandler`, `SearchUsersHandler`: answer queries from other modules
//!
//! ## Bus contract
//!
//! | Direction | Query |
//! |---|---|
//! | answers | `GetUser`, `SearchUsers` |
//! | asks | `ExcludedUserIds`, `MutualFriendCount` |
//!
//! Publishes `SocialEvent::UserRegistered`.
//!
//! ## Wiring
//!
//! ```ignore
//! let queries = Arc::new(QueryBus::new(config)?);
//! let service = Arc::new(UserService::new(
//!     Arc::new(InMemoryUserRepository::new()),
//!     Arc::new(BusSocialGraph::new(&queries)),
//!     events,
//! ));
//! let responders = serve_user_queries(&queries, Arc::clone(&service));
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{
    serve_user_queries, BusSocialGraph, GetUserHandler, InMemoryUserRepository, SearchUsersHandler,
};
pub use domain::{Recommendation, User};
pub use error::UserError;
pub use ports::{SocialGraph, UserApi, UserRepository};
pub use service::UserService;
