//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use common::{AppError, AppResult};
use domain::{validate_user_id, UserState};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Runtime state of a user, registering them on first contact
    async fn get_user_state(&self, user_id: i64) -> AppResult<UserState>;

    /// Start or stop a user's watch loop
    async fn update_running_status(&self, user_id: i64, is_running: bool) -> AppResult<bool>;

    /// Check whether a user is registered
    async fn user_exists(&self, user_id: i64) -> AppResult<bool>;

    /// Register a user unless already present; true when created
    async fn create_user_if_not_exists(&self, user_id: i64) -> AppResult<bool>;

    /// Initial state of every registered user
    async fn get_all_users_data(&self) -> AppResult<HashMap<i64, UserState>>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

/// Log storage failures at the service boundary, pass everything through
fn log_failure(err: AppError, action: &str) -> AppError {
    if err.is_database() {
        error!(code = err.code(), "Database error {}: {}", action, err);
    }
    err
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user_state(&self, user_id: i64) -> AppResult<UserState> {
        validate_user_id(user_id)?;

        let user = self
            .repo
            .get_by_user_id(user_id)
            .await
            .map_err(|e| log_failure(e, &format!("getting user data for {}", user_id)))?;

        match user {
            Some(user) => Ok(user.initial_state()),
            None => {
                info!("Creating new user {}", user_id);
                let user = self
                    .repo
                    .create_user(user_id)
                    .await
                    .map_err(|e| log_failure(e, &format!("creating user {}", user_id)))?;
                Ok(user.initial_state())
            }
        }
    }

    async fn update_running_status(&self, user_id: i64, is_running: bool) -> AppResult<bool> {
        let action = || format!("updating running status for user {}", user_id);

        if !self.user_exists(user_id).await? {
            return Err(AppError::UserNotFound(user_id));
        }

        let updated = self
            .repo
            .update_running_status(user_id, is_running)
            .await
            .map_err(|e| log_failure(e, &action()))?;

        if updated {
            info!("Updated running status for user {}: {}", user_id, is_running);
        }
        Ok(updated)
    }

    async fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        self.repo
            .user_exists(user_id)
            .await
            .map_err(|e| log_failure(e, &format!("checking if user {} exists", user_id)))
    }

    async fn create_user_if_not_exists(&self, user_id: i64) -> AppResult<bool> {
        validate_user_id(user_id)?;

        if self.user_exists(user_id).await? {
            return Ok(false);
        }

        self.repo
            .create_user(user_id)
            .await
            .map_err(|e| log_failure(e, &format!("creating user {}", user_id)))?;
        info!("Created new user {}", user_id);
        Ok(true)
    }

    async fn get_all_users_data(&self) -> AppResult<HashMap<i64, UserState>> {
        self.repo
            .get_all_users_data()
            .await
            .map_err(|e| log_failure(e, "getting all users data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use domain::User;
    use mockall::predicate::eq;
    use sea_orm::DbErr;

    use crate::repository::MockUserRepository;
    use common::DbResultExt;

    fn storage_failure<T>(context: &str) -> AppResult<T> {
        Err::<T, DbErr>(DbErr::Custom("connection reset".into())).context(context)
    }

    #[tokio::test]
    async fn test_get_user_state_existing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_user_id().with(eq(5)).returning(|id| {
            let mut user = User::new(id);
            user.is_running = true;
            Ok(Some(user))
        });
        repo.expect_create_user().never();

        let service = UserManager::new(Arc::new(repo));
        let state = service.get_user_state(5).await.unwrap();

        assert!(state.is_running);
        assert!(state.presets.is_empty());
        assert!(state.active_presets.is_empty());
    }

    #[tokio::test]
    async fn test_get_user_state_creates_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_user_id().returning(|_| Ok(None));
        repo.expect_create_user()
            .with(eq(9))
            .times(1)
            .returning(|id| Ok(User::new(id)));

        let service = UserManager::new(Arc::new(repo));
        let state = service.get_user_state(9).await.unwrap();

        assert!(!state.is_running);
    }

    #[tokio::test]
    async fn test_get_user_state_rejects_invalid_id() {
        let repo = MockUserRepository::new();
        let service = UserManager::new(Arc::new(repo));

        let result = service.get_user_state(0).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_running_status_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_user_exists().returning(|_| Ok(true));
        repo.expect_update_running_status()
            .with(eq(3), eq(true))
            .returning(|_, _| Ok(true));

        let service = UserManager::new(Arc::new(repo));
        assert!(service.update_running_status(3, true).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_running_status_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_user_exists().returning(|_| Ok(false));
        repo.expect_update_running_status().never();

        let service = UserManager::new(Arc::new(repo));
        let result = service.update_running_status(404, true).await;

        assert!(matches!(result, Err(AppError::UserNotFound(404))));
    }

    #[tokio::test]
    async fn test_update_running_status_propagates_database_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_user_exists().returning(|_| Ok(true));
        repo.expect_update_running_status()
            .returning(|_, _| storage_failure("Error updating user 3 running status to false"));

        let service = UserManager::new(Arc::new(repo));
        let err = service.update_running_status(3, false).await.unwrap_err();

        assert!(err.is_database());
        assert!(err.to_string().contains("running status"));
    }

    #[tokio::test]
    async fn test_create_user_if_not_exists() {
        let mut repo = MockUserRepository::new();
        repo.expect_user_exists().with(eq(1)).returning(|_| Ok(true));
        repo.expect_user_exists().with(eq(2)).returning(|_| Ok(false));
        repo.expect_create_user()
            .with(eq(2))
            .times(1)
            .returning(|id| Ok(User::new(id)));

        let service = UserManager::new(Arc::new(repo));
        assert!(!service.create_user_if_not_exists(1).await.unwrap());
        assert!(service.create_user_if_not_exists(2).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_all_users_data_passthrough() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_all_users_data().returning(|| {
            Ok(HashMap::from([(1, UserState::new(true)), (2, UserState::new(false))]))
        });

        let service = UserManager::new(Arc::new(repo));
        let data = service.get_all_users_data().await.unwrap();

        assert_eq!(data.len(), 2);
        assert!(data[&1].is_running);
        assert!(!data[&2].is_running);
    }

    #[tokio::test]
    async fn test_user_exists_propagates_database_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_user_exists()
            .returning(|_| storage_failure("Error getting user by user_id 8"));

        let service = UserManager::new(Arc::new(repo));
        let err = service.user_exists(8).await.unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }
}
