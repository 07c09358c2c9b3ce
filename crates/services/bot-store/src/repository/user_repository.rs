//! User repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::base::{Pagination, ReadRepository, Repository, WriteRepository};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::infra::run_in_transaction;
use common::{AppResult, DbResultExt};
use domain::{User, UserState};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Every storage failure surfaces as `AppError::Database` carrying the
/// operation and user id; a missing user is `None`/`false`, never an error.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by platform id
    async fn get_by_user_id(&self, user_id: i64) -> AppResult<Option<User>>;

    /// Create a new, not running user
    async fn create_user(&self, user_id: i64) -> AppResult<User>;

    /// Set the running flag; false when no such user exists
    async fn update_running_status(&self, user_id: i64, is_running: bool) -> AppResult<bool>;

    /// Check whether a user record exists
    async fn user_exists(&self, user_id: i64) -> AppResult<bool>;

    /// Initial state of every stored user, keyed by user id
    async fn get_all_users_data(&self) -> AppResult<HashMap<i64, UserState>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance bound to `db`
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ReadRepository<UserEntity, user::Model> for UserStore {}

impl WriteRepository<UserEntity, user::Model, ActiveModel> for UserStore {}

#[async_trait]
impl UserRepository for UserStore {
    async fn get_by_user_id(&self, user_id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(user_id)
            .one(self.db())
            .await
            .with_context(|| format!("Error getting user by user_id {}", user_id))?;

        Ok(result.map(User::from))
    }

    async fn create_user(&self, user_id: i64) -> AppResult<User> {
        let model = self
            .create(ActiveModel::from(User::new(user_id)))
            .await
            .map_err(|e| e.recontext(format!("Error creating user {}", user_id)))?;
        Ok(User::from(model))
    }

    async fn update_running_status(&self, user_id: i64, is_running: bool) -> AppResult<bool> {
        let updated = run_in_transaction(self.db(), |txn| {
            Box::pin(async move {
                let result = UserEntity::update_many()
                    .col_expr(user::Column::IsRunning, Expr::value(is_running))
                    .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
                    .filter(user::Column::UserId.eq(user_id))
                    .exec(txn)
                    .await?;
                Ok(result.rows_affected > 0)
            })
        })
        .await
        .with_context(|| {
            format!(
                "Error updating user {} running status to {}",
                user_id, is_running
            )
        })?;

        Ok(updated)
    }

    async fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        Ok(self.get_by_user_id(user_id).await?.is_some())
    }

    async fn get_all_users_data(&self) -> AppResult<HashMap<i64, UserState>> {
        let users = self
            .get_all(Pagination::all())
            .await
            .map_err(|e| e.recontext("Error loading all users data"))?;

        Ok(users
            .into_iter()
            .map(|model| (model.user_id, UserState::new(model.is_running)))
            .collect())
    }
}
