//! Outbound Ports (Driven Ports)
//!
//! Dependencies the User module needs: storage, and the Social module's view
//! of the friendship graph (reached over the query bus, never directly).

use async_trait::async_trait;
use shared_types::UserId;
use std::collections::HashSet;

use crate::domain::User;
use crate::error::UserError;

/// User storage (Driven Port)
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails if the username is taken.
    fn insert(&self, user: User) -> Result<(), UserError>;

    /// Replace an existing user.
    fn update(&self, user: User) -> Result<(), UserError>;

    /// Fetch by id.
    fn get(&self, user_id: UserId) -> Option<User>;

    /// Fetch by username, case-insensitively.
    fn find_by_username(&self, username: &str) -> Option<User>;

    /// Every stored user.
    fn all(&self) -> Vec<User>;

    /// Number of stored users.
    fn count(&self) -> usize;
}

/// Friendship graph provider (Driven Port)
///
/// Infallible by contract: implementations backed by the query bus return
/// the bus's fallback values when the Social module does not answer.
#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Users that must never be recommended to `user_id`.
    async fn excluded_ids(&self, user_id: UserId) -> HashSet<UserId>;

    /// Friends shared by `a` and `b`.
    async fn mutual_friend_count(&self, a: UserId, b: UserId) -> u32;
}
