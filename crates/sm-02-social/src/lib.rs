//! # SM-02 Social
//!
//! Friend requests, friendships and blocks. Owns the social graph and answers
//! every graph question other modules ask over the query bus.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `FriendRequest` lifecycle, mutual-count and exclusion rules
//! - **Ports Layer** (`ports/`):
//!   - `SocialApi`: Driving port
//!   - `SocialRepository`, `UserDirectory`: Driven ports
//! - **Service Layer** (`service/`): `SocialService` implements `SocialApi`
//! - **Adapters Layer** (`adapters/`):
//!   - `InMemorySocialRepository`: storage
//!   - `BusUserDirectory`: asks the User module over the query bus
//!   - one handler per owned query kind
//!
//! ## Bus contract
//!
//! | Direction | Query |
//! |---|---|
//! | answers | `IsFriend`, `MutualFriendCount`, `SaveFriendship`, `ExcludedUserIds` |
//! | asks | `GetUser` |
//!
//! Publishes `SocialEvent::FriendRequestSent` and `SocialEvent::FriendshipCreated`.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{
    serve_social_queries, BusUserDirectory, ExcludedUserIdsHandler, InMemorySocialRepository,
    IsFriendHandler, MutualFriendCountHandler, SaveFriendshipHandler,
};
pub use domain::{FriendRequest, FriendRequestId, RequestStatus};
pub use error::SocialError;
pub use ports::{SocialApi, SocialRepository, UserDirectory};
pub use service::SocialService;
