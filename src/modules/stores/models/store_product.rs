use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::text::contains_ignore_case;
use crate::core::traits::{Entity, Specification};
use crate::modules::products::models::Product;

/// A product sold at a store, with the store's own price and barcode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreProduct {
    pub store_id: i64,
    pub product_id: i64,
    pub price: Decimal,
    pub barcode: String,
    pub insert_date: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl StoreProduct {
    pub fn new(store_id: i64, product_id: i64, price: Decimal, barcode: impl Into<String>) -> Self {
        Self {
            store_id,
            product_id,
            price,
            barcode: barcode.into(),
            insert_date: Utc::now(),
            product: None,
        }
    }
}

impl Entity for StoreProduct {
    type Key = (i64, i64);
    type Filter = StoreProductFilter;

    fn key(&self) -> (i64, i64) {
        (self.store_id, self.product_id)
    }

    fn insert_date(&self) -> DateTime<Utc> {
        self.insert_date
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreProductFilter {
    /// The association for one (store, product) pair
    Pair { store_id: i64, product_id: i64 },
    /// Everything a store sells, optionally narrowed by barcode, price text
    /// or the product's name and producer
    InStore {
        store_id: i64,
        search: Option<String>,
    },
}

impl Specification<StoreProduct> for StoreProductFilter {
    fn is_satisfied_by(&self, row: &StoreProduct) -> bool {
        match self {
            StoreProductFilter::Pair {
                store_id,
                product_id,
            } => row.store_id == *store_id && row.product_id == *product_id,
            StoreProductFilter::InStore { store_id, search } => {
                if row.store_id != *store_id {
                    return false;
                }
                let Some(text) = search else {
                    return true;
                };
                contains_ignore_case(&row.barcode, text)
                    || contains_ignore_case(&format!("{:.2}", row.price), text)
                    || row.product.as_ref().is_some_and(|p| {
                        contains_ignore_case(&p.name, text)
                            || contains_ignore_case(&p.producer_name, text)
                    })
            }
        }
    }
}

/// POST /api/store/{id}/products/{productId} body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStoreProductRequest {
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub barcode: Option<String>,
}
