//! # Error Types
//!
//! Errors shared by more than one module.

use thiserror::Error;

/// Validation failures on user-supplied input, reused by every module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was blank.
    #[error("Field `{field}` must not be empty")]
    Empty { field: &'static str },

    /// A field exceeded its maximum length.
    #[error("Field `{field}` exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// A numeric field was outside its accepted range.
    #[error("Field `{field}` out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

/// Check that `value` is non-blank and at most `max` characters.
pub fn validate_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
