//! Outbound Ports (Driven Ports)

use async_trait::async_trait;
use shared_types::{ActivityId, Timestamp, UserId, UserSummary};

use crate::domain::Activity;
use crate::error::ActivityError;

/// Activity storage (Driven Port)
pub trait ActivityRepository: Send + Sync {
    fn insert(&self, activity: Activity);

    /// Apply `change` to the stored activity as one atomic step.
    ///
    /// The stored copy is only replaced when `change` succeeds. Returns the
    /// updated activity, the error from `change`, or `None` if `id` is unknown.
    fn modify(
        &self,
        id: ActivityId,
        change: &mut dyn FnMut(&mut Activity) -> Result<(), ActivityError>,
    ) -> Option<Result<Activity, ActivityError>>;

    fn get(&self, id: ActivityId) -> Option<Activity>;

    fn all(&self) -> Vec<Activity>;

    /// Remove activities with `expires_at <= now`. Returns how many.
    fn remove_expired(&self, now: Timestamp) -> usize;
}

/// User lookup (Driven Port), answered by the User module over the bus.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, user_id: UserId) -> Option<UserSummary>;
}

/// Friendship check (Driven Port), answered by the Social module over the bus.
#[async_trait]
pub trait FriendGraph: Send + Sync {
    /// `false` when the Social module did not answer.
    async fn are_friends(&self, a: UserId, b: UserId) -> bool;
}
