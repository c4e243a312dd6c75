//! User aggregate.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared_types::{validate_text, Timestamp, UserId, UserSummary, ValidationError};

pub const MAX_USERNAME_LEN: usize = 32;
pub const MAX_DISPLAY_NAME_LEN: usize = 64;

/// A registered account. Only its [`UserSummary`] leaves this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub created_at: Timestamp,
    pub active: bool,
}

impl User {
    /// Validate input and build a new active user.
    pub fn new(username: &str, display_name: &str) -> Result<Self, ValidationError> {
        let username = username.trim();
        validate_text("username", username, MAX_USERNAME_LEN)?;
        if username.chars().any(char::is_whitespace) {
            return Err(ValidationError::OutOfRange {
                field: "username",
                reason: "must not contain whitespace".into(),
            });
        }

        let display_name = display_name.trim();
        validate_text("display_name", display_name, MAX_DISPLAY_NAME_LEN)?;

        Ok(Self {
            id: UserId::new(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            created_at: Utc::now(),
            active: true,
        })
    }

    /// Public view shared with other modules.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            active: self.active,
        }
    }

    /// Case-insensitive substring match on username or display name.
    ///
    /// `needle` must already be normalised with [`normalize_search`].
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.username.to_lowercase().contains(needle)
            || self.display_name.to_lowercase().contains(needle)
    }
}

/// Trim and lowercase a search string. `None` for blank input.
#[must_use]
pub fn normalize_search(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}
