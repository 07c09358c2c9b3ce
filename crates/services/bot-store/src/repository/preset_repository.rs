//! Preset repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::base::{Pagination, ReadRepository, Repository, WriteRepository};
use super::entities::preset::{self, into_presets, ActiveModel, Entity as PresetEntity};
use crate::infra::run_in_transaction;
use common::{AppError, AppResult, DbResultExt};
use domain::{NewPreset, Preset, UserPresets};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Preset repository trait for dependency injection.
///
/// Input is expected to be validated already; storage failures surface
/// as `AppError::Database`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PresetRepository: Send + Sync {
    /// Find preset by id
    async fn get_by_preset_id(&self, preset_id: Uuid) -> AppResult<Option<Preset>>;

    /// All presets of a user, oldest first
    async fn get_by_user_id(&self, user_id: i64) -> AppResult<Vec<Preset>>;

    /// Active presets of a user, oldest first
    async fn get_active_by_user_id(&self, user_id: i64) -> AppResult<Vec<Preset>>;

    /// Store a new preset for a user
    async fn create_preset(&self, user_id: i64, data: NewPreset) -> AppResult<Preset>;

    /// Set the active flag; false when no such preset exists
    async fn update_active_status(&self, preset_id: Uuid, is_active: bool) -> AppResult<bool>;

    /// Remove a preset; false when no such preset exists
    async fn delete_preset(&self, preset_id: Uuid) -> AppResult<bool>;

    /// Every stored preset grouped by owner
    async fn get_all_presets_data(&self) -> AppResult<HashMap<i64, UserPresets>>;
}

/// Concrete implementation of PresetRepository
pub struct PresetStore {
    db: Arc<DatabaseConnection>,
}

impl PresetStore {
    /// Create new repository instance bound to `db`
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_for_user(&self, user_id: i64, only_active: bool) -> AppResult<Vec<Preset>> {
        let mut query = PresetEntity::find().filter(preset::Column::UserId.eq(user_id));
        if only_active {
            query = query.filter(preset::Column::IsActive.eq(true));
        }

        let context = || {
            let kind = if only_active { "active presets" } else { "presets" };
            format!("Error getting {} for user {}", kind, user_id)
        };
        let models = query
            .order_by_asc(preset::Column::CreatedAt)
            .all(self.db())
            .await
            .with_context(context)?;

        into_presets(models).with_context(context)
    }
}

impl Repository for PresetStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ReadRepository<PresetEntity, preset::Model> for PresetStore {}

impl WriteRepository<PresetEntity, preset::Model, ActiveModel> for PresetStore {}

#[async_trait]
impl PresetRepository for PresetStore {
    async fn get_by_preset_id(&self, preset_id: Uuid) -> AppResult<Option<Preset>> {
        let context = || format!("Error getting preset by preset_id {}", preset_id);
        let model = self
            .find_by_id(preset_id)
            .await
            .map_err(|e| e.recontext(context()))?;

        model.map(Preset::try_from).transpose().with_context(context)
    }

    async fn get_by_user_id(&self, user_id: i64) -> AppResult<Vec<Preset>> {
        self.find_for_user(user_id, false).await
    }

    async fn get_active_by_user_id(&self, user_id: i64) -> AppResult<Vec<Preset>> {
        self.find_for_user(user_id, true).await
    }

    async fn create_preset(&self, user_id: i64, data: NewPreset) -> AppResult<Preset> {
        let pairs = serde_json::to_string(&data.pairs)
            .map_err(|e| AppError::internal(format!("Cannot encode pairs: {}", e)))?;
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            preset_id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            preset_name: Set(data.preset_name),
            pairs: Set(pairs),
            interval: Set(data.interval.to_string()),
            percent: Set(data.percent),
            is_active: Set(data.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            alerts_triggered: Set(0),
            last_alert: Set(None),
        };

        let context = || format!("Error creating preset for user {}", user_id);
        let model = self
            .create(active_model)
            .await
            .map_err(|e| e.recontext(context()))?;

        Preset::try_from(model).with_context(context)
    }

    async fn update_active_status(&self, preset_id: Uuid, is_active: bool) -> AppResult<bool> {
        run_in_transaction(self.db(), |txn| {
            Box::pin(async move {
                let result = PresetEntity::update_many()
                    .col_expr(preset::Column::IsActive, Expr::value(is_active))
                    .col_expr(preset::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
                    .filter(preset::Column::PresetId.eq(preset_id))
                    .exec(txn)
                    .await?;
                Ok(result.rows_affected > 0)
            })
        })
        .await
        .with_context(|| {
            format!(
                "Error updating preset {} active status to {}",
                preset_id, is_active
            )
        })
    }

    async fn delete_preset(&self, preset_id: Uuid) -> AppResult<bool> {
        self.delete_by_id(preset_id)
            .await
            .map_err(|e| e.recontext(format!("Error deleting preset {}", preset_id)))
    }

    async fn get_all_presets_data(&self) -> AppResult<HashMap<i64, UserPresets>> {
        let context = "Error loading all presets data";
        let models = self
            .get_all(Pagination::all())
            .await
            .map_err(|e| e.recontext(context))?;
        let presets = into_presets(models).context(context)?;

        let mut grouped: HashMap<i64, UserPresets> = HashMap::new();
        for preset in &presets {
            grouped.entry(preset.user_id).or_default().insert(preset);
        }
        Ok(grouped)
    }
}
