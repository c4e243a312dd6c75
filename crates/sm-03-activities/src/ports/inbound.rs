//! Inbound Ports (Driving Ports)

use async_trait::async_trait;
use shared_types::{ActivityId, UserId};

use crate::domain::{Activity, NewActivity};
use crate::error::ActivityError;

/// Primary activity API (Driving Port)
#[async_trait]
pub trait ActivityApi: Send + Sync {
    /// Publish a new activity. The host must resolve through the User module.
    async fn create(&self, host_id: UserId, input: NewActivity) -> Result<Activity, ActivityError>;

    /// Fetch an activity `viewer` is allowed to see.
    async fn get(&self, activity_id: ActivityId, viewer: UserId) -> Result<Activity, ActivityError>;

    /// Unexpired activities `viewer` may see, soonest expiry first.
    ///
    /// Friends-only activities are shown to the host and the host's friends.
    async fn list_visible(&self, viewer: UserId) -> Vec<Activity>;

    /// Join an activity as a participant.
    async fn join(&self, activity_id: ActivityId, user_id: UserId) -> Result<Activity, ActivityError>;

    /// Leave an activity. Returns whether `user_id` was a participant.
    fn leave(&self, activity_id: ActivityId, user_id: UserId) -> Result<bool, ActivityError>;

    /// Activities hosted by `host_id`, expired ones included.
    fn hosted_by(&self, host_id: UserId) -> Vec<Activity>;

    /// Drop every activity expired as of now. Returns how many.
    fn purge_expired(&self) -> usize;
}
