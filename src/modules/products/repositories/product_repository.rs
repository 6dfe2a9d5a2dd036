// Product persistence for both backends

use crate::core::storage::{MemoryEntity, MemoryTables, MySqlEntity, MySqlQuery};
use crate::core::text::like_pattern;
use crate::core::{AppError, Result};
use crate::modules::products::models::{Product, ProductFilter};

impl MySqlEntity for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static str =
        "t.id, t.name, t.producer_name, t.last_change, t.image_path, t.insert_date";

    fn push_key(query: &mut MySqlQuery, key: &i64) {
        query.push("t.id = ").push_bind(*key);
    }

    fn push_filter(query: &mut MySqlQuery, filter: &ProductFilter) {
        match filter {
            ProductFilter::Identity {
                name,
                producer_name,
                except_id,
            } => {
                query
                    .push("t.name = ")
                    .push_bind(name.clone())
                    .push(" AND t.producer_name = ")
                    .push_bind(producer_name.clone());
                if let Some(id) = except_id {
                    query.push(" AND t.id <> ").push_bind(*id);
                }
            }
            ProductFilter::Search(text) => {
                let pattern = like_pattern(text);
                query
                    .push("(t.name LIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR t.producer_name LIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }
    }

    fn push_insert(&self, query: &mut MySqlQuery) {
        query.push(
            "INSERT INTO products (name, producer_name, last_change, image_path, insert_date) VALUES (",
        );
        let mut values = query.separated(", ");
        values
            .push_bind(self.name.clone())
            .push_bind(self.producer_name.clone())
            .push_bind(self.last_change)
            .push_bind(self.image_path.clone())
            .push_bind(self.insert_date);
        values.push_unseparated(")");
    }

    fn push_update(&self, query: &mut MySqlQuery) {
        query
            .push("UPDATE products SET name = ")
            .push_bind(self.name.clone())
            .push(", producer_name = ")
            .push_bind(self.producer_name.clone())
            .push(", last_change = ")
            .push_bind(self.last_change)
            .push(", image_path = ")
            .push_bind(self.image_path.clone())
            .push(" WHERE id = ")
            .push_bind(self.id);
    }

    fn push_delete(&self, query: &mut MySqlQuery) {
        query.push("DELETE FROM products WHERE id = ").push_bind(self.id);
    }
}

impl MemoryEntity for Product {
    fn rows(tables: &MemoryTables) -> &Vec<Self> {
        &tables.products
    }

    fn rows_mut(tables: &mut MemoryTables) -> &mut Vec<Self> {
        &mut tables.products
    }

    fn assign_key(&mut self, tables: &mut MemoryTables) {
        if self.id == 0 {
            self.id = tables.next_id();
        }
    }

    fn check_constraints(&self, tables: &MemoryTables) -> Result<()> {
        let duplicate = tables.products.iter().any(|other| {
            other.id != self.id
                && other.name == self.name
                && other.producer_name == self.producer_name
        });
        if duplicate {
            return Err(AppError::conflict(format!(
                "Duplicate entry '{}-{}' for key 'products.ux_products_name_producer'",
                self.name, self.producer_name
            )));
        }
        Ok(())
    }

    fn cascade_delete(&self, tables: &mut MemoryTables) {
        tables.store_products.retain(|row| row.product_id != self.id);
    }
}
