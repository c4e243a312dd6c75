//! In-memory activity storage.

use parking_lot::RwLock;
use shared_types::{ActivityId, Timestamp};
use std::collections::HashMap;

use crate::domain::Activity;
use crate::error::ActivityError;
use crate::ports::ActivityRepository;

#[derive(Default)]
pub struct InMemoryActivityRepository {
    activities: RwLock<HashMap<ActivityId, Activity>>,
}

impl InMemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.activities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.read().is_empty()
    }
}

impl ActivityRepository for InMemoryActivityRepository {
    fn insert(&self, activity: Activity) {
        self.activities.write().insert(activity.id, activity);
    }

    fn modify(
        &self,
        id: ActivityId,
        change: &mut dyn FnMut(&mut Activity) -> Result<(), ActivityError>,
    ) -> Option<Result<Activity, ActivityError>> {
        let mut activities = self.activities.write();
        let slot = activities.get_mut(&id)?;
        let mut draft = slot.clone();
        Some(change(&mut draft).map(|()| {
            *slot = draft.clone();
            draft
        }))
    }

    fn get(&self, id: ActivityId) -> Option<Activity> {
        self.activities.read().get(&id).cloned()
    }

    fn all(&self) -> Vec<Activity> {
        self.activities.read().values().cloned().collect()
    }

    fn remove_expired(&self, now: Timestamp) -> usize {
        let mut activities = self.activities.write();
        let before = activities.len();
        activities.retain(|_, a| !a.is_expired_at(now));
        before - activities.len()
    }
}
