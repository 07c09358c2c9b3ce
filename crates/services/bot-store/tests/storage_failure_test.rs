//! Storage failures surface as one classified error carrying the operation.

use std::sync::Arc;

use bot_store_lib::repository::entities::preset;
use bot_store_lib::repository::{PresetRepository, PresetStore, UserRepository, UserStore};
use chrono::Utc;
use common::AppError;
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
use uuid::Uuid;

fn boom() -> DbErr {
    DbErr::Custom("connection reset".to_string())
}

fn failing_queries() -> Arc<DatabaseConnection> {
    Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([boom()])
            .into_connection(),
    )
}

fn failing_execs() -> Arc<DatabaseConnection> {
    Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([boom()])
            .into_connection(),
    )
}

/// SQL statements recorded by the mock, one list per transaction
fn statement_log(db: Arc<DatabaseConnection>) -> Vec<Vec<String>> {
    let Ok(db) = Arc::try_unwrap(db) else {
        panic!("connection still shared");
    };
    db.into_transaction_log()
        .iter()
        .map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()).collect())
        .collect()
}

fn assert_database_error(err: &AppError, expected: &[&str]) {
    assert!(err.is_database(), "unexpected kind: {:?}", err);
    let message = err.to_string();
    assert!(message.contains("connection reset"), "cause missing: {}", message);
    for part in expected {
        assert!(message.contains(part), "{:?} missing from: {}", part, message);
    }
}

#[tokio::test]
async fn test_lookup_failure_names_user() {
    let repo = UserStore::new(failing_queries());

    let err = repo.get_by_user_id(12).await.unwrap_err();
    assert_database_error(&err, &["Error getting user by user_id 12"]);
}

#[tokio::test]
async fn test_user_exists_propagates_lookup_failure() {
    let repo = UserStore::new(failing_queries());

    let err = repo.user_exists(12).await.unwrap_err();
    assert_database_error(&err, &["user_id 12"]);
}

#[tokio::test]
async fn test_create_failure_names_user() {
    let repo = UserStore::new(failing_queries());

    let err = repo.create_user(31).await.unwrap_err();
    assert_database_error(&err, &["Error creating user 31"]);
}

#[tokio::test]
async fn test_update_failure_names_user_and_flag() {
    let db = failing_execs();
    let repo = UserStore::new(db.clone());

    let err = repo.update_running_status(8, true).await.unwrap_err();
    assert_database_error(&err, &["user 8", "running status to true"]);

    drop(repo);
    let log = statement_log(db);
    assert_eq!(log.len(), 1);
    let txn = &log[0];
    assert_eq!(txn.len(), 3);
    assert_eq!(txn[0], "BEGIN");
    assert!(txn[1].starts_with(r#"UPDATE "users""#), "{}", txn[1]);
    assert_eq!(txn[2], "ROLLBACK");
}

#[tokio::test]
async fn test_bulk_fetch_failure() {
    let repo = UserStore::new(failing_queries());

    let err = repo.get_all_users_data().await.unwrap_err();
    assert_database_error(&err, &["Error loading all users data"]);
}

#[tokio::test]
async fn test_preset_toggle_failure_names_preset_and_flag() {
    let db = failing_execs();
    let repo = PresetStore::new(db.clone());
    let id = Uuid::new_v4();

    let err = repo.update_active_status(id, false).await.unwrap_err();
    assert_database_error(&err, &[&id.to_string(), "active status to false"]);

    drop(repo);
    let log = statement_log(db);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].last().map(String::as_str), Some("ROLLBACK"));
}

#[tokio::test]
async fn test_preset_bulk_fetch_failure() {
    let repo = PresetStore::new(failing_queries());

    let err = repo.get_all_presets_data().await.unwrap_err();
    assert_database_error(&err, &["Error loading all presets data"]);
}

#[tokio::test]
async fn test_malformed_stored_preset_is_a_database_error() {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let row = preset::Model {
        preset_id: id,
        user_id: 1,
        preset_name: "Broken".to_string(),
        pairs: "not json".to_string(),
        interval: "5m".to_string(),
        percent: 1.0,
        is_active: true,
        created_at: now,
        updated_at: now,
        alerts_triggered: 0,
        last_alert: None,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection();
    let repo = PresetStore::new(Arc::new(db));

    let err = repo.get_by_preset_id(id).await.unwrap_err();
    assert!(err.is_database());
    assert!(err.to_string().contains("malformed pairs"));
    assert!(matches!(
        err,
        AppError::Database {
            source: DbErr::Json(_),
            ..
        }
    ));
}
