//! Commit-or-rollback wrapper around a single unit of work.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

/// Run `f` inside a fresh transaction on `db`.
///
/// The transaction is committed when `f` succeeds and rolled back when it
/// fails, so the connection is never left with an open transaction. A failed
/// rollback is logged and the original error is returned.
pub async fn run_in_transaction<F, T>(db: &DatabaseConnection, f: F) -> Result<T, DbErr>
where
    F: for<'a> FnOnce(
            &'a DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 'a>>
        + Send,
    T: Send,
{
    let txn = db.begin().await?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
