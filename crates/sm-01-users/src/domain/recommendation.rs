//! Friend recommendation ranking.

use serde::{Deserialize, Serialize};
use shared_types::UserSummary;

/// A suggested friend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub user: UserSummary,
    /// Friends the requester and `user` have in common.
    pub mutual_friends: u32,
}

/// Most mutual friends first, ties broken by username.
#[must_use]
pub fn rank(mut candidates: Vec<Recommendation>) -> Vec<Recommendation> {
    candidates.sort_by(|a, b| {
        b.mutual_friends
            .cmp(&a.mutual_friends)
            .then_with(|| a.user.username.cmp(&b.user.username))
    });
    candidates
}
