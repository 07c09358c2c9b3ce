//! Start-up state loading.
//!
//! Users come back from the user repository with empty preset containers;
//! this service fills them from the preset table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::AppResult;
use domain::UserState;

use crate::repository::{PresetRepository, UserRepository};

#[async_trait]
pub trait StateService: Send + Sync {
    /// Full state of every user, presets included
    async fn load_all(&self) -> AppResult<HashMap<i64, UserState>>;
}

pub struct StateLoader {
    users: Arc<dyn UserRepository>,
    presets: Arc<dyn PresetRepository>,
}

impl StateLoader {
    pub fn new(users: Arc<dyn UserRepository>, presets: Arc<dyn PresetRepository>) -> Self {
        Self { users, presets }
    }
}

#[async_trait]
impl StateService for StateLoader {
    async fn load_all(&self) -> AppResult<HashMap<i64, UserState>> {
        let mut state = self.users.get_all_users_data().await?;
        let grouped = self.presets.get_all_presets_data().await?;

        for (user_id, user_presets) in grouped {
            match state.get_mut(&user_id) {
                Some(user_state) => {
                    user_state.presets = user_presets.presets;
                    user_state.active_presets = user_presets.active_presets;
                }
                None => warn!(
                    "Skipping {} presets of unknown user {}",
                    user_presets.presets.len(),
                    user_id
                ),
            }
        }

        let running = state.values().filter(|s| s.is_running).count();
        info!("Loaded state for {} users ({} running)", state.len(), running);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use domain::{Interval, Preset, UserPresets};
    use uuid::Uuid;

    use crate::repository::{MockPresetRepository, MockUserRepository};

    fn preset(user_id: i64, is_active: bool) -> Preset {
        let now = Utc::now();
        Preset {
            preset_id: Uuid::new_v4(),
            user_id,
            preset_name: "Scalp".to_string(),
            pairs: vec!["SOLUSDT".to_string()],
            interval: Interval::OneMinute,
            percent: 1.5,
            is_active,
            created_at: now,
            updated_at: now,
            alerts_triggered: 0,
            last_alert: None,
        }
    }

    #[tokio::test]
    async fn test_load_all_merges_presets_into_users() {
        let active = preset(1, true);
        let idle = preset(1, false);
        let orphan = preset(99, true);

        let mut grouped: HashMap<i64, UserPresets> = HashMap::new();
        for p in [&active, &idle, &orphan] {
            grouped.entry(p.user_id).or_default().insert(p);
        }

        let mut users = MockUserRepository::new();
        users.expect_get_all_users_data().returning(|| {
            Ok(HashMap::from([(1, UserState::new(true)), (2, UserState::new(false))]))
        });
        let mut presets = MockPresetRepository::new();
        presets
            .expect_get_all_presets_data()
            .returning(move || Ok(grouped.clone()));

        let loader = StateLoader::new(Arc::new(users), Arc::new(presets));
        let state = loader.load_all().await.unwrap();

        assert_eq!(state.len(), 2);
        let first = &state[&1];
        assert!(first.is_running);
        assert_eq!(first.presets.len(), 2);
        assert_eq!(first.active_presets.len(), 1);
        assert!(first.active_presets.contains(&active.preset_id));
        assert_eq!(first.presets[&idle.preset_id].interval, Interval::OneMinute);

        let second = &state[&2];
        assert!(second.presets.is_empty());
        assert!(second.active_presets.is_empty());
        assert!(!state.contains_key(&99));
    }
}
