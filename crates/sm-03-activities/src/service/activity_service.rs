//! Activity Service
//!
//! Implements [`ActivityApi`] over a repository plus the user and friendship
//! gateways.

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use shared_bus::{EventPublisher, InMemoryEventBus, SocialEvent};
use shared_types::{ActivityId, UserId, Visibility};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{Activity, ActivityConfig, NewActivity};
use crate::error::ActivityError;
use crate::ports::{ActivityApi, ActivityRepository, FriendGraph, UserDirectory};

/// Activity Service implementation
pub struct ActivityService<R: ActivityRepository, U: UserDirectory, F: FriendGraph> {
    repo: Arc<R>,
    users: Arc<U>,
    friends: Arc<F>,
    events: Arc<InMemoryEventBus<SocialEvent>>,
    config: ActivityConfig,
}

impl<R: ActivityRepository, U: UserDirectory, F: FriendGraph> ActivityService<R, U, F> {
    pub fn new(
        repo: Arc<R>,
        users: Arc<U>,
        friends: Arc<F>,
        events: Arc<InMemoryEventBus<SocialEvent>>,
        config: ActivityConfig,
    ) -> Self {
        Self {
            repo,
            users,
            friends,
            events,
            config,
        }
    }

    async fn require_user(&self, user_id: UserId) -> Result<(), ActivityError> {
        match self.users.get_user(user_id).await {
            Some(user) if user.active => Ok(()),
            _ => Err(ActivityError::UnknownUser(user_id)),
        }
    }

    /// Whether `viewer` may see `activity`. Asks the Social module only for
    /// friends-only activities of other hosts.
    async fn can_see(&self, activity: &Activity, viewer: UserId) -> bool {
        match activity.visibility {
            Visibility::Public => true,
            Visibility::FriendsOnly if activity.involves(viewer) => true,
            Visibility::FriendsOnly => self.friends.are_friends(activity.host_id, viewer).await,
        }
    }
}

#[async_trait]
impl<R, U, F> ActivityApi for ActivityService<R, U, F>
where
    R: ActivityRepository,
    U: UserDirectory,
    F: FriendGraph,
{
    async fn create(&self, host_id: UserId, input: NewActivity) -> Result<Activity, ActivityError> {
        let activity = Activity::new(host_id, input, &self.config, Utc::now())?;
        self.require_user(host_id).await?;

        self.repo.insert(activity.clone());
        info!(
            activity_id = %activity.id,
            host_id = %host_id,
            visibility = ?activity.visibility,
            "Activity created"
        );
        self.events
            .publish(SocialEvent::ActivityCreated {
                activity_id: activity.id,
                host_id,
                title: activity.title.clone(),
                visibility: activity.visibility,
            })
            .await;

        Ok(activity)
    }

    async fn get(&self, activity_id: ActivityId, viewer: UserId) -> Result<Activity, ActivityError> {
        let activity = self
            .repo
            .get(activity_id)
            .ok_or(ActivityError::NotFound(activity_id))?;
        if !self.can_see(&activity, viewer).await {
            return Err(ActivityError::NotVisible);
        }
        Ok(activity)
    }

    async fn list_visible(&self, viewer: UserId) -> Vec<Activity> {
        let now = Utc::now();
        let candidates: Vec<Activity> = self
            .repo
            .all()
            .into_iter()
            .filter(|a| !a.is_expired_at(now))
            .collect();

        let checks = join_all(candidates.iter().map(|a| self.can_see(a, viewer))).await;
        let mut visible: Vec<Activity> = candidates
            .into_iter()
            .zip(checks)
            .filter_map(|(activity, ok)| ok.then_some(activity))
            .collect();
        visible.sort_by(|a, b| a.expires_at.cmp(&b.expires_at).then(a.title.cmp(&b.title)));

        debug!(viewer = %viewer, visible = visible.len(), "Listed activities");
        visible
    }

    async fn join(&self, activity_id: ActivityId, user_id: UserId) -> Result<Activity, ActivityError> {
        let activity = self
            .repo
            .get(activity_id)
            .ok_or(ActivityError::NotFound(activity_id))?;
        if !self.can_see(&activity, user_id).await {
            return Err(ActivityError::NotVisible);
        }
        self.require_user(user_id).await?;

        // Capacity and membership are rechecked against the stored copy.
        let activity = self
            .repo
            .modify(activity_id, &mut |a| a.admit(user_id, Utc::now()))
            .ok_or(ActivityError::NotFound(activity_id))??;

        info!(activity_id = %activity_id, user_id = %user_id, "Activity joined");
        self.events
            .publish(SocialEvent::ActivityJoined {
                activity_id,
                host_id: activity.host_id,
                participant_id: user_id,
            })
            .await;

        Ok(activity)
    }

    fn leave(&self, activity_id: ActivityId, user_id: UserId) -> Result<bool, ActivityError> {
        let mut left = false;
        self.repo
            .modify(activity_id, &mut |a| {
                left = a.release(user_id);
                Ok(())
            })
            .ok_or(ActivityError::NotFound(activity_id))??;
        Ok(left)
    }

    fn hosted_by(&self, host_id: UserId) -> Vec<Activity> {
        let mut hosted: Vec<_> = self
            .repo
            .all()
            .into_iter()
            .filter(|a| a.host_id == host_id)
            .collect();
        hosted.sort_by_key(|a| a.created_at);
        hosted
    }

    fn purge_expired(&self) -> usize {
        let removed = self.repo.remove_expired(Utc::now());
        if removed > 0 {
            info!(removed = removed, "Purged expired activities");
        }
        removed
    }
}
