//! Preset service - validated preset management on top of the repositories.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{validate_user_id, NewPreset, Preset};

use crate::repository::{PresetRepository, UserRepository};

/// Preset service trait for dependency injection.
#[async_trait]
pub trait PresetService: Send + Sync {
    /// Validate and store a preset for an existing user
    async fn create_preset(&self, user_id: i64, data: NewPreset) -> AppResult<Preset>;

    /// Get a preset by id
    async fn get_preset(&self, preset_id: Uuid) -> AppResult<Preset>;

    /// All presets of a user
    async fn list_presets(&self, user_id: i64) -> AppResult<Vec<Preset>>;

    /// Active presets of a user
    async fn list_active_presets(&self, user_id: i64) -> AppResult<Vec<Preset>>;

    /// Turn a preset on or off
    async fn set_preset_active(&self, preset_id: Uuid, is_active: bool) -> AppResult<()>;

    /// Remove a preset
    async fn delete_preset(&self, preset_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of PresetService.
pub struct PresetManager {
    users: Arc<dyn UserRepository>,
    presets: Arc<dyn PresetRepository>,
}

impl PresetManager {
    pub fn new(users: Arc<dyn UserRepository>, presets: Arc<dyn PresetRepository>) -> Self {
        Self { users, presets }
    }
}

#[async_trait]
impl PresetService for PresetManager {
    async fn create_preset(&self, user_id: i64, data: NewPreset) -> AppResult<Preset> {
        validate_user_id(user_id)?;
        let data = data.validated()?;

        if !self.users.user_exists(user_id).await? {
            return Err(AppError::UserNotFound(user_id));
        }

        let preset = self.presets.create_preset(user_id, data).await?;
        info!(
            "Created preset {} ({}) for user {}",
            preset.preset_id, preset.preset_name, user_id
        );
        Ok(preset)
    }

    async fn get_preset(&self, preset_id: Uuid) -> AppResult<Preset> {
        self.presets
            .get_by_preset_id(preset_id)
            .await?
            .ok_or(AppError::PresetNotFound(preset_id))
    }

    async fn list_presets(&self, user_id: i64) -> AppResult<Vec<Preset>> {
        self.presets.get_by_user_id(user_id).await
    }

    async fn list_active_presets(&self, user_id: i64) -> AppResult<Vec<Preset>> {
        self.presets.get_active_by_user_id(user_id).await
    }

    async fn set_preset_active(&self, preset_id: Uuid, is_active: bool) -> AppResult<()> {
        if !self.presets.update_active_status(preset_id, is_active).await? {
            return Err(AppError::PresetNotFound(preset_id));
        }
        info!("Preset {} active: {}", preset_id, is_active);
        Ok(())
    }

    async fn delete_preset(&self, preset_id: Uuid) -> AppResult<()> {
        if !self.presets.delete_preset(preset_id).await? {
            return Err(AppError::PresetNotFound(preset_id));
        }
        info!("Deleted preset {}", preset_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use domain::Interval;
    use mockall::predicate::{always, eq, ne};

    use crate::repository::{MockPresetRepository, MockUserRepository};

    fn new_preset() -> NewPreset {
        NewPreset {
            preset_name: " Majors ".to_string(),
            pairs: vec!["btcusdt".to_string(), "ETHUSDT".to_string()],
            interval: Interval::FiveMinutes,
            percent: 3.456,
            is_active: false,
        }
    }

    fn stored(user_id: i64, data: NewPreset) -> Preset {
        let now = Utc::now();
        Preset {
            preset_id: Uuid::new_v4(),
            user_id,
            preset_name: data.preset_name,
            pairs: data.pairs,
            interval: data.interval,
            percent: data.percent,
            is_active: data.is_active,
            created_at: now,
            updated_at: now,
            alerts_triggered: 0,
            last_alert: None,
        }
    }

    #[tokio::test]
    async fn test_create_preset_stores_normalised_data() {
        let mut users = MockUserRepository::new();
        users.expect_user_exists().with(eq(10)).returning(|_| Ok(true));

        let mut presets = MockPresetRepository::new();
        presets
            .expect_create_preset()
            .with(eq(10), always())
            .times(1)
            .returning(|user_id, data| Ok(stored(user_id, data)));

        let service = PresetManager::new(Arc::new(users), Arc::new(presets));
        let preset = service.create_preset(10, new_preset()).await.unwrap();

        assert_eq!(preset.preset_name, "Majors");
        assert_eq!(preset.pairs, vec!["BTCUSDT", "ETHUSDT"]);
        assert_eq!(preset.percent, 3.46);
    }

    #[tokio::test]
    async fn test_create_preset_rejects_invalid_input() {
        let users = MockUserRepository::new();
        let mut presets = MockPresetRepository::new();
        presets.expect_create_preset().never();

        let service = PresetManager::new(Arc::new(users), Arc::new(presets));
        let mut data = new_preset();
        data.pairs = vec!["BTC-EUR".to_string()];

        let result = service.create_preset(10, data).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_preset_for_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_user_exists().returning(|_| Ok(false));
        let mut presets = MockPresetRepository::new();
        presets.expect_create_preset().never();

        let service = PresetManager::new(Arc::new(users), Arc::new(presets));
        let result = service.create_preset(77, new_preset()).await;

        assert!(matches!(result, Err(AppError::UserNotFound(77))));
    }

    #[tokio::test]
    async fn test_get_preset_not_found() {
        let users = MockUserRepository::new();
        let mut presets = MockPresetRepository::new();
        presets.expect_get_by_preset_id().returning(|_| Ok(None));

        let service = PresetManager::new(Arc::new(users), Arc::new(presets));
        let id = Uuid::new_v4();

        let result = service.get_preset(id).await;
        assert!(matches!(result, Err(AppError::PresetNotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_set_preset_active() {
        let users = MockUserRepository::new();
        let known = Uuid::new_v4();
        let mut presets = MockPresetRepository::new();
        presets
            .expect_update_active_status()
            .with(eq(known), eq(true))
            .returning(|_, _| Ok(true));
        presets
            .expect_update_active_status()
            .with(ne(known), always())
            .returning(|_, _| Ok(false));

        let service = PresetManager::new(Arc::new(users), Arc::new(presets));

        assert!(service.set_preset_active(known, true).await.is_ok());
        let missing = Uuid::new_v4();
        assert!(matches!(
            service.set_preset_active(missing, true).await,
            Err(AppError::PresetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_preset_missing() {
        let users = MockUserRepository::new();
        let mut presets = MockPresetRepository::new();
        presets.expect_delete_preset().returning(|_| Ok(false));

        let service = PresetManager::new(Arc::new(users), Arc::new(presets));
        let result = service.delete_preset(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::PresetNotFound(_))));
    }
}
