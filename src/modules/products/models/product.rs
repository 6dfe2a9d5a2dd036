use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::text::contains_ignore_case;
use crate::core::traits::{Entity, Specification};

/// A product that stores can list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned by the store on insert; 0 until then
    pub id: i64,
    pub name: String,
    pub producer_name: String,
    pub last_change: Option<DateTime<Utc>>,
    pub image_path: Option<String>,
    pub insert_date: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>, producer_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            producer_name: producer_name.into(),
            last_change: None,
            image_path: None,
            insert_date: Utc::now(),
        }
    }
}

impl Entity for Product {
    type Key = i64;
    type Filter = ProductFilter;

    fn key(&self) -> i64 {
        self.id
    }

    fn insert_date(&self) -> DateTime<Utc> {
        self.insert_date
    }
}

/// Product queries the services need
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    /// Exact (name, producer name) match, optionally ignoring one product
    Identity {
        name: String,
        producer_name: String,
        except_id: Option<i64>,
    },
    /// Name or producer name contains the text
    Search(String),
}

impl Specification<Product> for ProductFilter {
    fn is_satisfied_by(&self, product: &Product) -> bool {
        match self {
            ProductFilter::Identity {
                name,
                producer_name,
                except_id,
            } => {
                product.name == *name
                    && product.producer_name == *producer_name
                    && except_id.map_or(true, |id| product.id != id)
            }
            ProductFilter::Search(text) => {
                contains_ignore_case(&product.name, text)
                    || contains_ignore_case(&product.producer_name, text)
            }
        }
    }
}

/// POST /api/product body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub producer_name: Option<String>,
}

/// PUT /api/product/{id} body; blank fields leave the value unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub producer_name: Option<String>,
}

/// POST /api/product/{id}/image response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageResponse {
    pub image_path: String,
}
