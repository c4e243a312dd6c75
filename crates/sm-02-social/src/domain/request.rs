//! Friend requests.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared_types::{Timestamp, UserId, UserPair};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FriendRequestId(Uuid);

impl FriendRequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FriendRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FriendRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        })
    }
}

/// A request from `from` to become friends with `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: FriendRequestId,
    pub from: UserId,
    pub to: UserId,
    pub status: RequestStatus,
    pub created_at: Timestamp,
    pub answered_at: Option<Timestamp>,
}

impl FriendRequest {
    pub fn new(from: UserId, to: UserId) -> Self {
        Self {
            id: FriendRequestId::new(),
            from,
            to,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            answered_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// The two users, unordered.
    pub fn pair(&self) -> UserPair {
        UserPair::new(self.from, self.to)
    }

    /// Move out of `Pending`. Returns the old status if it was not pending.
    pub fn answer(&mut self, status: RequestStatus) -> Result<(), RequestStatus> {
        if !self.is_pending() {
            return Err(self.status);
        }
        self.status = status;
        self.answered_at = Some(Utc::now());
        Ok(())
    }
}
