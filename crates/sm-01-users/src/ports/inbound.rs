//! Inbound Ports (Driving Ports)
//!
//! The API other parts of the runtime use to drive the User module.

use async_trait::async_trait;
use shared_types::{UserId, UserSummary};

use crate::domain::Recommendation;
use crate::error::UserError;

/// Primary user API (Driving Port)
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Create an account. Usernames are unique, case-insensitively.
    async fn register(&self, username: &str, display_name: &str) -> Result<UserSummary, UserError>;

    /// Look up a user, active or not.
    fn get_user(&self, user_id: UserId) -> Result<UserSummary, UserError>;

    /// Active users whose username or display name contains `query`,
    /// never including `requester`. Blank queries match nobody.
    fn search(&self, query: &str, requester: UserId) -> Vec<UserSummary>;

    /// Deactivate an account. Deactivated users are hidden from search and
    /// recommendations but still resolvable by id.
    async fn deactivate(&self, user_id: UserId) -> Result<UserSummary, UserError>;

    /// Up to `limit` people `user_id` may want to befriend.
    ///
    /// Asks the Social module which users to exclude and how many friends
    /// each candidate shares with `user_id`. If Social is slow or down the
    /// query bus answers with empty exclusions and zero mutuals, so this
    /// degrades to a plain user listing instead of failing.
    async fn recommend(&self, user_id: UserId, limit: usize)
        -> Result<Vec<Recommendation>, UserError>;
}
