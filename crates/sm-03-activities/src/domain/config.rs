//! Activity limits

use crate::error::ActivityError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Limits applied when activities are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Largest capacity a host may ask for.
    pub max_capacity: u32,
    /// How far in the future an activity may expire.
    pub max_duration_hours: i64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            max_capacity: 100,
            max_duration_hours: 24 * 30,
        }
    }
}

impl ActivityConfig {
    pub fn validate(&self) -> Result<(), ActivityError> {
        if self.max_capacity == 0 {
            return Err(ActivityError::InvalidConfig(
                "max_capacity cannot be 0".into(),
            ));
        }
        if self.max_duration_hours <= 0 {
            return Err(ActivityError::InvalidConfig(
                "max_duration_hours must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn max_duration(&self) -> Duration {
        Duration::hours(self.max_duration_hours)
    }
}
