//! Generic MySQL repository.
//!
//! Each entity describes its table and how its key, filters and writes
//! compile to SQL; [`MySqlRepository`] does the rest. Queries are built with
//! `QueryBuilder` so every user value travels as a bound parameter.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use tokio::sync::Mutex;

use crate::core::error::AppError;
use crate::core::pagination::{PageRequest, Paginated};
use crate::core::traits::{
    Entity, Include, Repository, RepositoryFactory, StagedChange,
};
use crate::core::Result;
use crate::modules::auth::repositories::{MySqlUserRepository, UserRepository};
use crate::modules::products::models::Product;
use crate::modules::stores::models::{Store, StoreProduct};

pub type MySqlQuery = QueryBuilder<'static, MySql>;

/// SQL description of an entity
///
/// Select, key and filter fragments refer to the entity table through the
/// alias `t`.
#[async_trait]
pub trait MySqlEntity: Entity + for<'r> FromRow<'r, MySqlRow> + Unpin {
    const TABLE: &'static str;

    /// Select list, qualified with `t.`
    const COLUMNS: &'static str;

    /// Condition matching one primary key
    fn push_key(query: &mut MySqlQuery, key: &Self::Key);

    /// Condition matching a filter
    fn push_filter(query: &mut MySqlQuery, filter: &Self::Filter);

    /// Complete INSERT statement for this row
    fn push_insert(&self, query: &mut MySqlQuery);

    /// Complete UPDATE statement for this row
    fn push_update(&self, query: &mut MySqlQuery);

    /// Complete DELETE statement for this row
    fn push_delete(&self, query: &mut MySqlQuery);

    /// Eager-load related rows into an already fetched page
    async fn load_relations(_rows: &mut [Self], _pool: &MySqlPool) -> Result<()> {
        Ok(())
    }
}

/// Translate constraint failures into [`AppError::Conflict`]
pub(crate) fn map_write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_foreign_key_violation() =>
        {
            AppError::conflict(db.message().to_string())
        }
        _ => AppError::Database(err),
    }
}

/// Request-scoped repository over one table
pub struct MySqlRepository<T: MySqlEntity> {
    pool: MySqlPool,
    staged: Mutex<Vec<StagedChange<T>>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: MySqlEntity> MySqlRepository<T> {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            staged: Mutex::new(Vec::new()),
            _entity: PhantomData,
        }
    }

    fn select() -> MySqlQuery {
        QueryBuilder::new(format!("SELECT {} FROM {} t", T::COLUMNS, T::TABLE))
    }

    async fn stage(&self, change: StagedChange<T>) {
        self.staged.lock().await.push(change);
    }
}

#[async_trait]
impl<T: MySqlEntity> Repository<T> for MySqlRepository<T> {
    async fn add(&self, entity: T) {
        self.stage(StagedChange::Add(entity)).await;
    }

    async fn update(&self, entity: T) {
        self.stage(StagedChange::Update(entity)).await;
    }

    async fn delete(&self, entity: T) {
        self.stage(StagedChange::Delete(entity)).await;
    }

    async fn find(&self, key: &T::Key) -> Result<Option<T>> {
        let mut query = Self::select();
        query.push(" WHERE ");
        T::push_key(&mut query, key);

        let row = query.build_query_as::<T>().fetch_optional(&self.pool).await?;
        Ok(row)
    }

    async fn get_first(&self, filter: &T::Filter, include: Include) -> Result<Option<T>> {
        let mut query = Self::select();
        query.push(" WHERE ");
        T::push_filter(&mut query, filter);
        query.push(" ORDER BY t.insert_date DESC LIMIT 1");

        let Some(row) = query.build_query_as::<T>().fetch_optional(&self.pool).await? else {
            return Ok(None);
        };

        let mut rows = vec![row];
        if include == Include::Relations {
            T::load_relations(&mut rows, &self.pool).await?;
        }
        Ok(rows.pop())
    }

    async fn to_paginated(
        &self,
        filter: Option<&T::Filter>,
        page: PageRequest,
        include: Include,
    ) -> Result<Paginated<T>> {
        let mut count: MySqlQuery =
            QueryBuilder::new(format!("SELECT COUNT(*) FROM {} t", T::TABLE));
        if let Some(filter) = filter {
            count.push(" WHERE ");
            T::push_filter(&mut count, filter);
        }
        let total_rows: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = Self::select();
        if let Some(filter) = filter {
            query.push(" WHERE ");
            T::push_filter(&mut query, filter);
        }
        query
            .push(" ORDER BY t.insert_date DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let mut rows = query.build_query_as::<T>().fetch_all(&self.pool).await?;
        if include == Include::Relations {
            T::load_relations(&mut rows, &self.pool).await?;
        }

        Ok(Paginated::new(
            page,
            u64::try_from(total_rows).unwrap_or_default(),
            rows,
        ))
    }

    async fn save(&self) -> Result<()> {
        let staged = std::mem::take(&mut *self.staged.lock().await);
        if staged.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for change in &staged {
            let mut statement: MySqlQuery = QueryBuilder::new("");
            match change {
                StagedChange::Add(entity) => entity.push_insert(&mut statement),
                StagedChange::Update(entity) => entity.push_update(&mut statement),
                StagedChange::Delete(entity) => entity.push_delete(&mut statement),
            }
            statement
                .build()
                .execute(&mut *tx)
                .await
                .map_err(map_write_error)?;
        }
        tx.commit().await?;

        tracing::debug!(table = T::TABLE, changes = staged.len(), "Changes committed");
        Ok(())
    }
}

/// Factory over a shared MySQL pool
#[derive(Clone)]
pub struct MySqlRepositories {
    pool: MySqlPool,
}

impl MySqlRepositories {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations from `migrations/`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RepositoryFactory for MySqlRepositories {
    fn products(&self) -> Arc<dyn Repository<Product>> {
        Arc::new(MySqlRepository::<Product>::new(self.pool.clone()))
    }

    fn stores(&self) -> Arc<dyn Repository<Store>> {
        Arc::new(MySqlRepository::<Store>::new(self.pool.clone()))
    }

    fn store_products(&self) -> Arc<dyn Repository<StoreProduct>> {
        Arc::new(MySqlRepository::<StoreProduct>::new(self.pool.clone()))
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(MySqlUserRepository::new(self.pool.clone()))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
