//! Outbound Ports (Driven Ports)

use async_trait::async_trait;
use shared_types::{UserId, UserPair, UserSummary};
use std::collections::HashSet;

use crate::domain::{FriendRequest, FriendRequestId};

/// Social graph storage (Driven Port)
pub trait SocialRepository: Send + Sync {
    /// Store a friendship. Returns `true` if it was new.
    fn insert_friendship(&self, pair: UserPair) -> bool;

    /// Returns `true` if a friendship was removed.
    fn remove_friendship(&self, pair: UserPair) -> bool;

    fn has_friendship(&self, pair: UserPair) -> bool;

    fn friends_of(&self, user: UserId) -> HashSet<UserId>;

    /// Insert or replace a request.
    fn save_request(&self, request: FriendRequest);

    fn get_request(&self, id: FriendRequestId) -> Option<FriendRequest>;

    /// Every request `user` sent or received, any status.
    fn requests_involving(&self, user: UserId) -> Vec<FriendRequest>;

    /// Drop every request between the two users. Returns how many.
    fn remove_requests(&self, pair: UserPair) -> usize;

    /// Record that `blocker` blocked `blocked`. Returns `true` if new.
    fn insert_block(&self, blocker: UserId, blocked: UserId) -> bool;

    fn remove_block(&self, blocker: UserId, blocked: UserId) -> bool;

    /// Users `user` blocked plus users who blocked `user`.
    fn blocks_involving(&self, user: UserId) -> HashSet<UserId>;
}

/// User lookup (Driven Port), answered by the User module over the bus.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `None` when the user is unknown or the User module did not answer.
    async fn get_user(&self, user_id: UserId) -> Option<UserSummary>;
}
