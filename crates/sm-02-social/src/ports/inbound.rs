//! Inbound Ports (Driving Ports)

use async_trait::async_trait;
use shared_types::UserId;
use std::collections::HashSet;

use crate::domain::{FriendRequest, FriendRequestId};
use crate::error::SocialError;

/// Primary social-graph API (Driving Port)
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// Ask `to` to become friends with `from`.
    ///
    /// Both users must resolve through the User module. If `to` already has a
    /// pending request to `from`, that request is accepted instead.
    async fn send_request(&self, from: UserId, to: UserId) -> Result<FriendRequest, SocialError>;

    /// Accept a pending request. Only its recipient may do so.
    async fn accept_request(
        &self,
        request_id: FriendRequestId,
        acting_user: UserId,
    ) -> Result<FriendRequest, SocialError>;

    /// Decline a pending request. Only its recipient may do so.
    async fn decline_request(
        &self,
        request_id: FriendRequestId,
        acting_user: UserId,
    ) -> Result<FriendRequest, SocialError>;

    /// Persist a friendship directly. Idempotent: returns `false` if the
    /// friendship already existed.
    async fn save_friendship(&self, a: UserId, b: UserId) -> Result<bool, SocialError>;

    /// Remove a friendship. Returns whether one existed.
    fn remove_friend(&self, a: UserId, b: UserId) -> bool;

    /// Block `blocked` on behalf of `blocker`, dropping any friendship and
    /// pending requests between them.
    fn block(&self, blocker: UserId, blocked: UserId) -> Result<(), SocialError>;

    /// Lift a block. Returns whether one existed.
    fn unblock(&self, blocker: UserId, blocked: UserId) -> bool;

    fn are_friends(&self, a: UserId, b: UserId) -> bool;

    fn friends_of(&self, user: UserId) -> HashSet<UserId>;

    fn mutual_friend_count(&self, a: UserId, b: UserId) -> u32;

    /// Friends, pending requests either way and blocks either way.
    fn excluded_ids(&self, user: UserId) -> HashSet<UserId>;

    /// Requests waiting for `user` to answer.
    fn incoming_requests(&self, user: UserId) -> Vec<FriendRequest>;
}
