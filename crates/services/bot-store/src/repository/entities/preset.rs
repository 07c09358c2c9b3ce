//! Preset database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Interval, Preset};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "presets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub preset_id: Uuid,
    pub user_id: i64,
    pub preset_name: String,
    /// JSON array of trading pairs
    #[sea_orm(column_type = "Text")]
    pub pairs: String,
    pub interval: String,
    pub percent: f64,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub alerts_triggered: i32,
    pub last_alert: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Fails when the stored pairs or interval no longer decode.
impl TryFrom<Model> for Preset {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let pairs: Vec<String> = serde_json::from_str(&model.pairs).map_err(|e| {
            DbErr::Json(format!("preset {} has malformed pairs: {}", model.preset_id, e))
        })?;
        let interval: Interval = model.interval.parse().map_err(|e| {
            DbErr::Type(format!("preset {}: {}", model.preset_id, e))
        })?;

        Ok(Preset {
            preset_id: model.preset_id,
            user_id: model.user_id,
            preset_name: model.preset_name,
            pairs,
            interval,
            percent: model.percent,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
            alerts_triggered: model.alerts_triggered,
            last_alert: model.last_alert,
        })
    }
}

/// Decode a batch of rows, stopping at the first malformed one
pub fn into_presets(models: Vec<Model>) -> Result<Vec<Preset>, DbErr> {
    models.into_iter().map(Preset::try_from).collect()
}
