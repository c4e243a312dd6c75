//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `UserId`, `UserSummary`
//! - **Graph**: `UserPair`
//! - **Activities**: `ActivityId`, `Visibility`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Wall-clock timestamp used across modules.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random user id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The slice of a user that other modules are allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User id.
    pub id: UserId,
    /// Unique handle.
    pub username: String,
    /// Free-form name shown in the UI.
    pub display_name: String,
    /// Whether the account is active. Inactive users are never recommended.
    pub active: bool,
}

// =============================================================================
// CLUSTER B: SOCIAL GRAPH
// =============================================================================

/// An unordered pair of users.
///
/// The pair is normalised on construction so `(a, b)` and `(b, a)` compare
/// and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserPair {
    low: UserId,
    high: UserId,
}

impl UserPair {
    /// Build a normalised pair.
    #[must_use]
    pub fn new(a: UserId, b: UserId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Both members, lowest first.
    #[must_use]
    pub fn members(&self) -> (UserId, UserId) {
        (self.low, self.high)
    }

    /// Whether `user` is one of the two members.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.low == user || self.high == user
    }

    /// The member that is not `user`, if `user` belongs to the pair.
    #[must_use]
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if self.low == user {
            Some(self.high)
        } else if self.high == user {
            Some(self.low)
        } else {
            None
        }
    }

    /// True when both members are the same user.
    #[must_use]
    pub fn is_self_pair(&self) -> bool {
        self.low == self.high
    }
}

// =============================================================================
// CLUSTER C: ACTIVITIES
// =============================================================================

/// Unique identifier for an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(Uuid);

impl ActivityId {
    /// Generate a fresh random activity id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who may see and join an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Anyone.
    #[default]
    Public,
    /// The host and the host's friends.
    FriendsOnly,
}
