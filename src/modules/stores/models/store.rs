use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::text::contains_ignore_case;
use crate::core::traits::{Entity, Specification};

use super::StoreProduct;

/// Kind of retail outlet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StoreType {
    #[default]
    Market,
    SuperMarket,
    HyperMarket,
    Other,
}

impl StoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Market => "Market",
            StoreType::SuperMarket => "SuperMarket",
            StoreType::HyperMarket => "HyperMarket",
            StoreType::Other => "Other",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown store type: {0}")]
pub struct UnknownStoreType(String);

impl FromStr for StoreType {
    type Err = UnknownStoreType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Market" => Ok(StoreType::Market),
            "SuperMarket" => Ok(StoreType::SuperMarket),
            "HyperMarket" => Ok(StoreType::HyperMarket),
            "Other" => Ok(StoreType::Other),
            other => Err(UnknownStoreType(other.to_string())),
        }
    }
}

impl TryFrom<String> for StoreType {
    type Error = UnknownStoreType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A store and, when requested, the products it sells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub store_type: StoreType,
    pub last_change: Option<DateTime<Utc>>,
    pub insert_date: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_products: Option<Vec<StoreProduct>>,
}

impl Store {
    pub fn new(name: impl Into<String>, address: impl Into<String>, store_type: StoreType) -> Self {
        Self {
            id: 0,
            name: name.into(),
            address: address.into(),
            store_type,
            last_change: None,
            insert_date: Utc::now(),
            store_products: None,
        }
    }
}

impl Entity for Store {
    type Key = i64;
    type Filter = StoreFilter;

    fn key(&self) -> i64 {
        self.id
    }

    fn insert_date(&self) -> DateTime<Utc> {
        self.insert_date
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreFilter {
    /// Exact (name, address, type) match, optionally ignoring one store
    Identity {
        name: String,
        address: String,
        store_type: StoreType,
        except_id: Option<i64>,
    },
    /// Primary key; used for eager-loaded single fetches
    Id(i64),
    /// Name, address or type name contains the text
    Search(String),
}

impl Specification<Store> for StoreFilter {
    fn is_satisfied_by(&self, store: &Store) -> bool {
        match self {
            StoreFilter::Identity {
                name,
                address,
                store_type,
                except_id,
            } => {
                store.name == *name
                    && store.address == *address
                    && store.store_type == *store_type
                    && except_id.map_or(true, |id| store.id != id)
            }
            StoreFilter::Id(id) => store.id == *id,
            StoreFilter::Search(text) => {
                contains_ignore_case(&store.name, text)
                    || contains_ignore_case(&store.address, text)
                    || contains_ignore_case(store.store_type.as_str(), text)
            }
        }
    }
}

/// POST /api/store body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStoreRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "type")]
    pub store_type: Option<StoreType>,
}

/// PUT /api/store/{id} body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditStoreRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "type")]
    pub store_type: Option<StoreType>,
}
