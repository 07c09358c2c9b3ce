//! Base repository traits following Interface Segregation Principle (ISP).
//!
//! These traits provide the generic capabilities concrete repositories
//! build on: fetch-by-key, fetch-all and create-with-fields, plus delete.
//! Every capability wraps storage failures with the table it was touching.

use std::fmt::Debug;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, Iterable, PrimaryKeyToColumn, PrimaryKeyTrait,
    QueryOrder, QuerySelect,
};

use common::{AppResult, DbResultExt};

use crate::infra::run_in_transaction;

/// Primary key value type of an entity
pub type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Optional window over a bulk fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    /// No window: fetch every row
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }
}

/// Table name used in error context
pub(crate) fn entity_name<E: EntityTrait>() -> String {
    E::default().table_name().to_string()
}

/// Access to the connection a repository is bound to
pub trait Repository: Send + Sync {
    fn db(&self) -> &DatabaseConnection;
}

/// Read operations (Query) - Single Responsibility
#[async_trait]
pub trait ReadRepository<E, M>: Repository
where
    E: EntityTrait<Model = M>,
    M: Send + Sync + FromQueryResult,
{
    /// Find entity by primary key
    async fn find_by_id(&self, id: PrimaryKeyOf<E>) -> AppResult<Option<M>>
    where
        PrimaryKeyOf<E>: Send + Sync + Debug,
    {
        let key = format!("{:?}", id);
        E::find_by_id(id)
            .one(self.db())
            .await
            .with_context(|| format!("Error getting {} by id {}", entity_name::<E>(), key))
    }

    /// Find all entities, ordered by primary key
    async fn get_all(&self, page: Pagination) -> AppResult<Vec<M>> {
        let mut query = E::find();
        for key in E::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }
        if let Some(offset) = page.offset {
            query = query.offset(offset);
        }
        if let Some(limit) = page.limit {
            query = query.limit(limit);
        }

        query
            .all(self.db())
            .await
            .with_context(|| format!("Error getting all {}", entity_name::<E>()))
    }
}

/// Write operations (Command) - Single Responsibility
///
/// Each write runs in its own transaction: committed on success, rolled
/// back on failure.
#[async_trait]
pub trait WriteRepository<E, M, A>: Repository
where
    E: EntityTrait<Model = M>,
    M: Send + Sync + IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
{
    /// Insert new entity
    async fn create(&self, model: A) -> AppResult<M> {
        run_in_transaction(self.db(), |txn| Box::pin(async move { model.insert(txn).await }))
            .await
            .with_context(|| format!("Error creating {}", entity_name::<E>()))
    }

    /// Delete entity by primary key, returning whether a row was removed
    async fn delete_by_id(&self, id: PrimaryKeyOf<E>) -> AppResult<bool>
    where
        PrimaryKeyOf<E>: Send + Sync + Debug,
    {
        let key = format!("{:?}", id);
        run_in_transaction(self.db(), |txn| {
            Box::pin(async move {
                let result = E::delete_by_id(id).exec(txn).await?;
                Ok(result.rows_affected > 0)
            })
        })
        .await
        .with_context(|| format!("Error deleting {} by id {}", entity_name::<E>(), key))
    }
}
