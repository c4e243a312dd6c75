//! Error types for the Social module

use shared_types::UserId;
use thiserror::Error;

use crate::domain::{FriendRequestId, RequestStatus};

/// Errors that can occur in the Social module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocialError {
    #[error("A user cannot befriend or block themselves")]
    SelfRelation,

    #[error("Unknown or inactive user: {0}")]
    UnknownUser(UserId),

    #[error("Users are already friends")]
    AlreadyFriends,

    #[error("A friend request between these users is already pending")]
    RequestAlreadyPending,

    #[error("Users have blocked each other")]
    Blocked,

    #[error("Friend request not found: {0}")]
    RequestNotFound(FriendRequestId),

    #[error("Only the recipient may answer a friend request")]
    NotRecipient,

    #[error("Friend request already {0}")]
    RequestNotPending(RequestStatus),
}
