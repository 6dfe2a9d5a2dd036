use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::pagination::{PageRequest, Paginated};
use crate::core::Result;
use crate::modules::auth::repositories::UserRepository;
use crate::modules::products::models::Product;
use crate::modules::stores::models::{Store, StoreProduct};

/// A persisted, listable row type
///
/// The insertion timestamp is the default ordering key of every listing.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Key: Clone + Debug + PartialEq + Send + Sync + 'static;
    type Filter: Specification<Self> + Clone + Debug + Send + Sync + 'static;

    fn key(&self) -> Self::Key;

    fn insert_date(&self) -> DateTime<Utc>;
}

/// Typed predicate over an entity
///
/// Filters are plain enums; SQL backends compile them to query fragments and
/// in-process backends evaluate them with this method. Relations are loaded
/// before evaluation, so a filter may look at them.
pub trait Specification<T> {
    fn is_satisfied_by(&self, entity: &T) -> bool;
}

/// Whether related rows are eager-loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Include {
    #[default]
    Nothing,
    Relations,
}

/// Generic data access over one entity type
///
/// `add`, `update` and `delete` only stage changes; nothing reaches the store
/// until `save` commits the whole stage as one unit.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn add(&self, entity: T);

    async fn update(&self, entity: T);

    async fn delete(&self, entity: T);

    /// Exact primary key lookup; absence is not an error
    async fn find(&self, key: &T::Key) -> Result<Option<T>>;

    /// First entity (newest first) satisfying `filter`
    async fn get_first(&self, filter: &T::Filter, include: Include) -> Result<Option<T>>;

    /// One page of entities, newest first, optionally filtered
    async fn to_paginated(
        &self,
        filter: Option<&T::Filter>,
        page: PageRequest,
        include: Include,
    ) -> Result<Paginated<T>>;

    /// Commit every staged change atomically and clear the stage
    async fn save(&self) -> Result<()>;
}

/// Hands out fresh, request-scoped repositories over one backing store
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    fn products(&self) -> Arc<dyn Repository<Product>>;

    fn stores(&self) -> Arc<dyn Repository<Store>>;

    fn store_products(&self) -> Arc<dyn Repository<StoreProduct>>;

    fn users(&self) -> Arc<dyn UserRepository>;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> Result<()>;
}

/// A change waiting for `save`
#[derive(Debug, Clone)]
pub enum StagedChange<T> {
    Add(T),
    Update(T),
    Delete(T),
}
