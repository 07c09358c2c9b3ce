//! Bot Store Library
//!
//! Persistence for the price-alert bot: users with their running flag and
//! the presets they watch. Repositories translate every storage failure
//! into one classified error; services add lazy user registration,
//! validation and start-up state loading.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DbErr};
use tracing::info;

use crate::config::BotStoreConfig;
use crate::infra::Database;
use crate::repository::{PresetStore, UserStore};
use crate::service::{
    PresetManager, PresetService, StateLoader, StateService, UserManager, UserService,
};

/// Services wired over one database connection.
#[derive(Clone)]
pub struct BotStore {
    pub users: Arc<dyn UserService>,
    pub presets: Arc<dyn PresetService>,
    pub state: Arc<dyn StateService>,
}

impl BotStore {
    /// Create repositories and services bound to `db`.
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let preset_repo = Arc::new(PresetStore::new(db));

        Self {
            users: Arc::new(UserManager::new(user_repo.clone())),
            presets: Arc::new(PresetManager::new(user_repo.clone(), preset_repo.clone())),
            state: Arc::new(StateLoader::new(user_repo, preset_repo)),
        }
    }
}

/// Connect, apply pending migrations and wire the services.
pub async fn connect(config: &BotStoreConfig) -> Result<BotStore, DbErr> {
    let db = Database::connect(&config.database).await?;
    db.ping().await?;
    Ok(BotStore::new(db.get_connection()))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &BotStoreConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
