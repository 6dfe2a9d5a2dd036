use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{MySqlPool, QueryBuilder};

use crate::core::storage::{MemoryEntity, MemoryTables, MySqlEntity, MySqlQuery};
use crate::core::text::like_pattern;
use crate::core::{AppError, Result};
use crate::modules::products::models::Product;
use crate::modules::stores::models::{StoreProduct, StoreProductFilter};

#[async_trait]
impl MySqlEntity for StoreProduct {
    const TABLE: &'static str = "store_products";
    const COLUMNS: &'static str = "t.store_id, t.product_id, t.price, t.barcode, t.insert_date";

    fn push_key(query: &mut MySqlQuery, key: &(i64, i64)) {
        query
            .push("t.store_id = ")
            .push_bind(key.0)
            .push(" AND t.product_id = ")
            .push_bind(key.1);
    }

    fn push_filter(query: &mut MySqlQuery, filter: &StoreProductFilter) {
        match filter {
            StoreProductFilter::Pair {
                store_id,
                product_id,
            } => Self::push_key(query, &(*store_id, *product_id)),
            StoreProductFilter::InStore { store_id, search } => {
                query.push("t.store_id = ").push_bind(*store_id);
                if let Some(text) = search {
                    let pattern = like_pattern(text);
                    query
                        .push(" AND (t.barcode LIKE ")
                        .push_bind(pattern.clone())
                        .push(" OR CAST(t.price AS CHAR) LIKE ")
                        .push_bind(pattern.clone())
                        .push(
                            " OR EXISTS (SELECT 1 FROM products p WHERE p.id = t.product_id AND (p.name LIKE ",
                        )
                        .push_bind(pattern.clone())
                        .push(" OR p.producer_name LIKE ")
                        .push_bind(pattern)
                        .push(")))");
                }
            }
        }
    }

    fn push_insert(&self, query: &mut MySqlQuery) {
        query.push(
            "INSERT INTO store_products (store_id, product_id, price, barcode, insert_date) VALUES (",
        );
        let mut values = query.separated(", ");
        values
            .push_bind(self.store_id)
            .push_bind(self.product_id)
            .push_bind(self.price)
            .push_bind(self.barcode.clone())
            .push_bind(self.insert_date);
        values.push_unseparated(")");
    }

    fn push_update(&self, query: &mut MySqlQuery) {
        query
            .push("UPDATE store_products SET price = ")
            .push_bind(self.price)
            .push(", barcode = ")
            .push_bind(self.barcode.clone())
            .push(" WHERE store_id = ")
            .push_bind(self.store_id)
            .push(" AND product_id = ")
            .push_bind(self.product_id);
    }

    fn push_delete(&self, query: &mut MySqlQuery) {
        query
            .push("DELETE FROM store_products WHERE store_id = ")
            .push_bind(self.store_id)
            .push(" AND product_id = ")
            .push_bind(self.product_id);
    }

    async fn load_relations(rows: &mut [Self], pool: &MySqlPool) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut query: MySqlQuery = QueryBuilder::new(format!(
            "SELECT {} FROM {} t WHERE t.id IN (",
            Product::COLUMNS,
            Product::TABLE
        ));
        let mut ids = query.separated(", ");
        for row in rows.iter() {
            ids.push_bind(row.product_id);
        }
        ids.push_unseparated(")");

        let products: HashMap<i64, Product> = query
            .build_query_as::<Product>()
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        for row in rows.iter_mut() {
            row.product = products.get(&row.product_id).cloned();
        }
        Ok(())
    }
}

impl MemoryEntity for StoreProduct {
    fn rows(tables: &MemoryTables) -> &Vec<Self> {
        &tables.store_products
    }

    fn rows_mut(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.store_products
    }

    fn check_constraints(&self, tables: &MemoryTables) -> Result<()> {
        if !tables.stores.iter().any(|store| store.id == self.store_id) {
            return Err(AppError::conflict(format!(
                "Cannot add row: store {} does not exist",
                self.store_id
            )));
        }
        if !tables
            .products
            .iter()
            .any(|product| product.id == self.product_id)
        {
            return Err(AppError::conflict(format!(
                "Cannot add row: product {} does not exist",
                self.product_id
            )));
        }
        Ok(())
    }

    fn load_relations(&mut self, tables: &MemoryTables) {
        self.product = tables
            .products
            .iter()
            .find(|product| product.id == self.product_id)
            .cloned();
    }

    fn clear_relations(&mut self) {
        self.product = None;
    }
}
