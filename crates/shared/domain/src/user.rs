//! User domain entity and the per-user runtime state built from it.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_IS_RUNNING;
use crate::error::{DomainError, DomainResult};
use crate::preset::PresetConfig;

/// Bot user. The id is supplied by the messaging platform, never generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    /// Whether the user's price-watch loop is active
    pub is_running: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_alerts_sent: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new, not running user
    pub fn new(user_id: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            is_running: DEFAULT_IS_RUNNING,
            created_at: now,
            updated_at: now,
            total_alerts_sent: 0,
            last_activity: None,
        }
    }

    /// Fresh runtime state for this user, with no presets loaded yet
    pub fn initial_state(&self) -> UserState {
        UserState::new(self.is_running)
    }
}

/// In-memory initialisation record for one user.
///
/// `presets` and `active_presets` start empty and are filled from the
/// preset table by the state loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub active_presets: HashSet<Uuid>,
    pub presets: HashMap<Uuid, PresetConfig>,
    pub is_running: bool,
}

impl UserState {
    pub fn new(is_running: bool) -> Self {
        Self {
            active_presets: HashSet::new(),
            presets: HashMap::new(),
            is_running,
        }
    }
}

/// Check that a user id coming from outside is usable as a key
pub fn validate_user_id(user_id: i64) -> DomainResult<i64> {
    if user_id <= 0 {
        return Err(DomainError::validation("User ID must be positive"));
    }
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_not_running() {
        let user = User::new(42);
        assert_eq!(user.user_id, 42);
        assert!(!user.is_running);
        assert_eq!(user.total_alerts_sent, 0);
        assert!(user.last_activity.is_none());
    }

    #[test]
    fn test_initial_state_has_empty_containers() {
        let mut user = User::new(7);
        user.is_running = true;

        let state = user.initial_state();
        assert!(state.is_running);
        assert!(state.presets.is_empty());
        assert!(state.active_presets.is_empty());
    }

    #[test]
    fn test_validate_user_id() {
        assert_eq!(validate_user_id(1), Ok(1));
        assert!(validate_user_id(0).is_err());
        assert!(validate_user_id(-5).is_err());
    }
}
