//! Error types for the User module

use shared_types::{UserId, ValidationError};
use thiserror::Error;

/// Errors that can occur in the User module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("User is deactivated: {0}")]
    Inactive(UserId),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}
