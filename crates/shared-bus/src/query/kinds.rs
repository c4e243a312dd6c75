//! Concrete query kinds exchanged between the User and Social modules.
//!
//! | Query | Answered by | Fallback |
//! |---|---|---|
//! | `GetUserRequest` | Users | not found |
//! | `IsFriendRequest` | Social | `false` |
//! | `MutualFriendCountRequest` | Social | `0` |
//! | `SaveFriendshipRequest` | Social | `false` |
//! | `ExcludedUserIdsRequest` | Social | empty set |
//! | `SearchUsersRequest` | Users | empty list |

use crate::query::message::{Query, QueryKind};
use serde::{Deserialize, Serialize};
use shared_types::{UserId, UserSummary};
use std::collections::HashSet;

// =============================================================================
// GET USER
// =============================================================================

/// Look up a user by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUserRequest {
    pub user_id: UserId,
}

/// Result of [`GetUserRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetUserResponse {
    /// `None` when the user does not exist or the lookup degraded.
    pub user: Option<UserSummary>,
}

impl GetUserResponse {
    /// Whether a user came back.
    #[must_use]
    pub fn found(&self) -> bool {
        self.user.is_some()
    }
}

impl Query for GetUserRequest {
    type Response = GetUserResponse;
    const KIND: QueryKind = QueryKind::GetUser;

    fn fallback() -> Self::Response {
        GetUserResponse { user: None }
    }
}

// =============================================================================
// IS FRIEND
// =============================================================================

/// Are `user_a` and `user_b` friends?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsFriendRequest {
    pub user_a: UserId,
    pub user_b: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IsFriendResponse {
    pub are_friends: bool,
}

impl Query for IsFriendRequest {
    type Response = IsFriendResponse;
    const KIND: QueryKind = QueryKind::IsFriend;

    fn fallback() -> Self::Response {
        IsFriendResponse { are_friends: false }
    }
}

// =============================================================================
// MUTUAL FRIEND COUNT
// =============================================================================

/// How many friends do `user_a` and `user_b` have in common?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutualFriendCountRequest {
    pub user_a: UserId,
    pub user_b: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MutualFriendCountResponse {
    pub count: u32,
}

impl Query for MutualFriendCountRequest {
    type Response = MutualFriendCountResponse;
    const KIND: QueryKind = QueryKind::MutualFriendCount;

    fn fallback() -> Self::Response {
        MutualFriendCountResponse { count: 0 }
    }
}

// =============================================================================
// SAVE FRIENDSHIP
// =============================================================================

/// Persist a friendship between two users. Idempotent on the answering side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFriendshipRequest {
    pub user_a: UserId,
    pub user_b: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveFriendshipResponse {
    pub success: bool,
}

impl Query for SaveFriendshipRequest {
    type Response = SaveFriendshipResponse;
    const KIND: QueryKind = QueryKind::SaveFriendship;

    fn fallback() -> Self::Response {
        SaveFriendshipResponse { success: false }
    }
}

// =============================================================================
// EXCLUDED USER IDS
// =============================================================================

/// Users that must never be recommended to `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedUserIdsRequest {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExcludedUserIdsResponse {
    pub excluded_ids: HashSet<UserId>,
}

impl Query for ExcludedUserIdsRequest {
    type Response = ExcludedUserIdsResponse;
    const KIND: QueryKind = QueryKind::ExcludedUserIds;

    fn fallback() -> Self::Response {
        ExcludedUserIdsResponse::default()
    }
}

// =============================================================================
// SEARCH USERS
// =============================================================================

/// Free-text user search on behalf of `requesting_user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchUsersRequest {
    pub search_query: String,
    pub requesting_user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchUsersResponse {
    pub users: Vec<UserSummary>,
}

impl Query for SearchUsersRequest {
    type Response = SearchUsersResponse;
    const KIND: QueryKind = QueryKind::SearchUsers;

    fn fallback() -> Self::Response {
        SearchUsersResponse::default()
    }
}
