//! Activity entity and its join rules.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared_types::{validate_text, ActivityId, Timestamp, UserId, ValidationError, Visibility};

use super::ActivityConfig;
use crate::error::ActivityError;

pub const MAX_TITLE_LEN: usize = 80;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Input for creating an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    /// Participants allowed besides the host.
    pub capacity: u32,
    pub expires_at: Timestamp,
}

/// A hosted activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub host_id: UserId,
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub capacity: u32,
    /// Joined users in join order. The host is never listed.
    pub participants: Vec<UserId>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Activity {
    /// Validate `input` against `config` as of `now`.
    pub fn new(
        host_id: UserId,
        input: NewActivity,
        config: &ActivityConfig,
        now: Timestamp,
    ) -> Result<Self, ActivityError> {
        let title = input.title.trim().to_string();
        validate_text("title", &title, MAX_TITLE_LEN)?;
        if input.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_LEN,
            }
            .into());
        }
        if input.capacity == 0 || input.capacity > config.max_capacity {
            return Err(ValidationError::OutOfRange {
                field: "capacity",
                reason: format!("must be between 1 and {}", config.max_capacity),
            }
            .into());
        }
        if input.expires_at <= now {
            return Err(ValidationError::OutOfRange {
                field: "expires_at",
                reason: "must be in the future".into(),
            }
            .into());
        }
        if input.expires_at - now > config.max_duration() {
            return Err(ValidationError::OutOfRange {
                field: "expires_at",
                reason: format!("must be within {} hours", config.max_duration_hours),
            }
            .into());
        }

        Ok(Self {
            id: ActivityId::new(),
            host_id,
            title,
            description: input.description,
            visibility: input.visibility,
            capacity: input.capacity,
            participants: Vec::new(),
            created_at: now,
            expires_at: input.expires_at,
        })
    }

    /// An activity is expired from its expiry instant onwards.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.capacity as usize
    }

    #[must_use]
    pub fn spots_left(&self) -> u32 {
        let taken = u32::try_from(self.participants.len()).unwrap_or(u32::MAX);
        self.capacity.saturating_sub(taken)
    }

    #[must_use]
    pub fn involves(&self, user: UserId) -> bool {
        self.host_id == user || self.participants.contains(&user)
    }

    /// Add `user` if the activity still takes participants at `now`.
    ///
    /// Visibility is checked by the caller: it needs the social graph.
    pub fn admit(&mut self, user: UserId, now: Timestamp) -> Result<(), ActivityError> {
        if self.is_expired_at(now) {
            return Err(ActivityError::Expired(self.id));
        }
        if self.involves(user) {
            return Err(ActivityError::AlreadyParticipant);
        }
        if self.is_full() {
            return Err(ActivityError::Full {
                capacity: self.capacity,
            });
        }
        self.participants.push(user);
        Ok(())
    }

    /// Returns whether `user` was a participant.
    pub fn release(&mut self, user: UserId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| *p != user);
        before != self.participants.len()
    }
}
