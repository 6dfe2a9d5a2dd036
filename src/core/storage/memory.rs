//! In-process backend with the same contract as the MySQL repositories.
//!
//! Tables are plain vectors behind one `RwLock`. `save` applies the stage to
//! a copy of every table and swaps it in only when every change succeeded,
//! so a rejected write leaves nothing behind.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::error::AppError;
use crate::core::pagination::{PageRequest, Paginated};
use crate::core::traits::{
    Entity, Include, Repository, RepositoryFactory, Specification, StagedChange,
};
use crate::core::Result;
use crate::modules::auth::models::User;
use crate::modules::auth::repositories::{MemoryUserRepository, UserRepository};
use crate::modules::products::models::Product;
use crate::modules::stores::models::{Store, StoreProduct};

#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    pub(crate) products: Vec<Product>,
    pub(crate) stores: Vec<Store>,
    pub(crate) store_products: Vec<StoreProduct>,
    pub(crate) users: Vec<User>,
    sequence: i64,
}

impl MemoryTables {
    /// Next value of the shared auto-increment counter
    pub(crate) fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }
}

/// Table access and integrity rules for one entity
pub trait MemoryEntity: Entity {
    fn rows(tables: &MemoryTables) -> &Vec<Self>;

    fn rows_mut(tables: &mut MemoryTables) -> &mut Vec<Self>;

    /// Fill generated keys before the row is inserted
    fn assign_key(&mut self, _tables: &mut MemoryTables) {}

    /// Unique and foreign key checks against every other row
    fn check_constraints(&self, tables: &MemoryTables) -> Result<()>;

    /// Remove rows that reference this one
    fn cascade_delete(&self, _tables: &mut MemoryTables) {}

    fn load_relations(&mut self, _tables: &MemoryTables) {}

    fn clear_relations(&mut self) {}
}

/// Shared handle to the in-process tables
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<MemoryTables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, MemoryTables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, MemoryTables> {
        self.tables.write().await
    }
}

fn apply<T: MemoryEntity>(tables: &mut MemoryTables, change: StagedChange<T>) -> Result<()> {
    match change {
        StagedChange::Add(mut entity) => {
            entity.clear_relations();
            entity.assign_key(tables);
            let key = entity.key();
            if T::rows(tables).iter().any(|row| row.key() == key) {
                return Err(AppError::conflict(format!(
                    "Duplicate entry {key:?} for key 'PRIMARY'"
                )));
            }
            entity.check_constraints(tables)?;
            T::rows_mut(tables).push(entity);
        }
        StagedChange::Update(mut entity) => {
            entity.clear_relations();
            entity.check_constraints(tables)?;
            let key = entity.key();
            if let Some(row) = T::rows_mut(tables).iter_mut().find(|row| row.key() == key) {
                *row = entity;
            }
        }
        StagedChange::Delete(entity) => {
            let key = entity.key();
            T::rows_mut(tables).retain(|row| row.key() != key);
            entity.cascade_delete(tables);
        }
    }
    Ok(())
}

/// Request-scoped repository over one in-process table
pub struct MemoryRepository<T: MemoryEntity> {
    db: MemoryDatabase,
    staged: Mutex<Vec<StagedChange<T>>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: MemoryEntity> MemoryRepository<T> {
    pub fn new(db: MemoryDatabase) -> Self {
        Self {
            db,
            staged: Mutex::new(Vec::new()),
            _entity: PhantomData,
        }
    }

    /// Matching rows, newest first, with relations resolved as requested
    async fn select(&self, filter: Option<&T::Filter>, include: Include) -> Vec<T> {
        let tables = self.db.read().await;

        // newest rows first so equal timestamps still list newest first
        let mut rows: Vec<T> = T::rows(&tables)
            .iter()
            .rev()
            .cloned()
            .map(|mut row| {
                row.load_relations(&tables);
                row
            })
            .filter(|row| filter.map_or(true, |f| f.is_satisfied_by(row)))
            .collect();
        rows.sort_by(|a, b| b.insert_date().cmp(&a.insert_date()));

        if include == Include::Nothing {
            rows.iter_mut().for_each(T::clear_relations);
        }
        rows
    }

    async fn stage(&self, change: StagedChange<T>) {
        self.staged.lock().await.push(change);
    }
}

#[async_trait]
impl<T: MemoryEntity> Repository<T> for MemoryRepository<T> {
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
        let tables = self.db.read().await;
        Ok(T::rows(&tables).iter().find(|row| row.key() == *key).cloned())
    }

    async fn get_first(&self, filter: &T::Filter, include: Include) -> Result<Option<T>> {
        Ok(self.select(Some(filter), include).await.into_iter().next())
    }

    async fn to_paginated(
        &self,
        filter: Option<&T::Filter>,
        page: PageRequest,
        include: Include,
    ) -> Result<Paginated<T>> {
        let rows = self.select(filter, include).await;
        let total_rows = rows.len() as u64;
        let data = rows
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit() as usize)
            .collect();
        Ok(Paginated::new(page, total_rows, data))
    }

    async fn save(&self) -> Result<()> {
        let staged = std::mem::take(&mut *self.staged.lock().await);
        if staged.is_empty() {
            return Ok(());
        }

        let mut tables = self.db.write().await;
        let mut next = tables.clone();
        for change in staged {
            apply(&mut next, change)?;
        }
        *tables = next;
        Ok(())
    }
}

#[async_trait]
impl RepositoryFactory for MemoryDatabase {
    fn products(&self) -> Arc<dyn Repository<Product>> {
        Arc::new(MemoryRepository::<Product>::new(self.clone()))
    }

    fn stores(&self) -> Arc<dyn Repository<Store>> {
        Arc::new(MemoryRepository::<Store>::new(self.clone()))
    }

    fn store_products(&self) -> Arc<dyn Repository<StoreProduct>> {
        Arc::new(MemoryRepository::<StoreProduct>::new(self.clone()))
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(MemoryUserRepository::new(self.clone()))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
