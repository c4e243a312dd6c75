//! Error types for the Activity module

use shared_types::{ActivityId, UserId, ValidationError};
use thiserror::Error;

/// Errors that can occur in the Activity module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    #[error("Activity not found: {0}")]
    NotFound(ActivityId),

    #[error("Unknown or inactive user: {0}")]
    UnknownUser(UserId),

    #[error("Activity {0} has expired")]
    Expired(ActivityId),

    #[error("Activity is full ({capacity} participants)")]
    Full { capacity: u32 },

    #[error("User already takes part in this activity")]
    AlreadyParticipant,

    #[error("Activity is not visible to this user")]
    NotVisible,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
