use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{MySqlPool, QueryBuilder};

use crate::core::storage::{MemoryEntity, MemoryTables, MySqlEntity, MySqlQuery};
use crate::core::text::like_pattern;
use crate::core::{AppError, Result};
use crate::modules::stores::models::{Store, StoreFilter, StoreProduct};

#[async_trait]
impl MySqlEntity for Store {
    const TABLE: &'static str = "stores";
    const COLUMNS: &'static str =
        "t.id, t.name, t.address, t.store_type, t.last_change, t.insert_date";

    fn push_key(query: &mut MySqlQuery, key: &i64) {
        query.push("t.id = ").push_bind(*key);
    }

    fn push_filter(query: &mut MySqlQuery, filter: &StoreFilter) {
        match filter {
            StoreFilter::Identity {
                name,
                address,
                store_type,
                except_id,
            } => {
                query
                    .push("t.name = ")
                    .push_bind(name.clone())
                    .push(" AND t.address = ")
                    .push_bind(address.clone())
                    .push(" AND t.store_type = ")
                    .push_bind(store_type.as_str());
                if let Some(id) = except_id {
                    query.push(" AND t.id <> ").push_bind(*id);
                }
            }
            StoreFilter::Id(id) => {
                query.push("t.id = ").push_bind(*id);
            }
            StoreFilter::Search(text) => {
                let pattern = like_pattern(text);
                query
                    .push("(t.name LIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR t.address LIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR t.store_type LIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }
    }

    fn push_insert(&self, query: &mut MySqlQuery) {
        query.push(
            "INSERT INTO stores (name, address, store_type, last_change, insert_date) VALUES (",
        );
        let mut values = query.separated(", ");
        values
            .push_bind(self.name.clone())
            .push_bind(self.address.clone())
            .push_bind(self.store_type.as_str())
            .push_bind(self.last_change)
            .push_bind(self.insert_date);
        values.push_unseparated(")");
    }

    fn push_update(&self, query: &mut MySqlQuery) {
        query
            .push("UPDATE stores SET name = ")
            .push_bind(self.name.clone())
            .push(", address = ")
            .push_bind(self.address.clone())
            .push(", store_type = ")
            .push_bind(self.store_type.as_str())
            .push(", last_change = ")
            .push_bind(self.last_change)
            .push(" WHERE id = ")
            .push_bind(self.id);
    }

    fn push_delete(&self, query: &mut MySqlQuery) {
        query.push("DELETE FROM stores WHERE id = ").push_bind(self.id);
    }

    async fn load_relations(stores: &mut [Self], pool: &MySqlPool) -> Result<()> {
        if stores.is_empty() {
            return Ok(());
        }

        let mut query: MySqlQuery = QueryBuilder::new(format!(
            "SELECT {} FROM {} t WHERE t.store_id IN (",
            StoreProduct::COLUMNS,
            StoreProduct::TABLE
        ));
        let mut ids = query.separated(", ");
        for store in stores.iter() {
            ids.push_bind(store.id);
        }
        ids.push_unseparated(") ORDER BY t.insert_date DESC");

        let mut rows = query
            .build_query_as::<StoreProduct>()
            .fetch_all(pool)
            .await?;
        <StoreProduct as MySqlEntity>::load_relations(&mut rows, pool).await?;

        let mut by_store: HashMap<i64, Vec<StoreProduct>> = HashMap::new();
        for row in rows {
            by_store.entry(row.store_id).or_default().push(row);
        }
        for store in stores.iter_mut() {
            store.store_products = Some(by_store.remove(&store.id).unwrap_or_default());
        }
        Ok(())
    }
}

impl MemoryEntity for Store {
    fn rows(tables: &MemoryTables) -> &Vec<Self> {
        &tables.stores
    }

    fn rows_mut(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.stores
    }

    fn assign_key(&mut self, tables: &mut MemoryTables) {
        if self.id == 0 {
            self.id = tables.next_id();
        }
    }

    fn check_constraints(&self, tables: &MemoryTables) -> Result<()> {
        let duplicate = tables.stores.iter().any(|other| {
            other.id != self.id
                && other.name == self.name
                && other.address == self.address
                && other.store_type == self.store_type
        });
        if duplicate {
            return Err(AppError::conflict(format!(
                "Duplicate entry '{}-{}-{}' for key 'stores.ux_stores_identity'",
                self.name, self.address, self.store_type
            )));
        }
        Ok(())
    }

    fn cascade_delete(&self, tables: &mut MemoryTables) {
        tables.store_products.retain(|row| row.store_id != self.id);
    }

    fn load_relations(&mut self, tables: &MemoryTables) {
        let mut sold: Vec<StoreProduct> = tables
            .store_products
            .iter()
            .rev()
            .filter(|row| row.store_id == self.id)
            .cloned()
            .map(|mut row| {
                MemoryEntity::load_relations(&mut row, tables);
                row
            })
            .collect();
        sold.sort_by(|a, b| b.insert_date.cmp(&a.insert_date));
        self.store_products = Some(sold);
    }

    fn clear_relations(&mut self) {
        self.store_products = None;
    }
}
