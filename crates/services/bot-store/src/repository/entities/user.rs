//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Platform-assigned id, never generated by the database
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub is_running: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub total_alerts_sent: i32,
    pub last_activity: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::preset::Entity")]
    Presets,
}

impl Related<super::preset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Presets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            user_id: model.user_id,
            is_running: model.is_running,
            created_at: model.created_at,
            updated_at: model.updated_at,
            total_alerts_sent: model.total_alerts_sent,
            last_activity: model.last_activity,
        }
    }
}

/// Build an insertable row from a domain user
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        ActiveModel {
            user_id: Set(user.user_id),
            is_running: Set(user.is_running),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
            total_alerts_sent: Set(user.total_alerts_sent),
            last_activity: Set(user.last_activity),
        }
    }
}
