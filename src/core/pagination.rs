use serde::{Deserialize, Serialize};

/// One page of an ordered result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Requested page, 1-based
    pub count: u32,
    /// Requested page size
    pub limit: u32,
    /// Number of pages reported to the client
    pub total: u64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(page: PageRequest, total_rows: u64, data: Vec<T>) -> Self {
        Self {
            count: page.count,
            limit: page.limit,
            total: total_pages(total_rows, page.limit),
            data,
        }
    }
}

/// Page count for `total_rows` split by `limit`.
///
/// Clients depend on the historical `rows / limit + 1` value, which reports
/// one trailing empty page when `rows` is an exact multiple of `limit`.
pub fn total_pages(total_rows: u64, limit: u32) -> u64 {
    if total_rows == 0 {
        0
    } else {
        total_rows / u64::from(limit.max(1)) + 1
    }
}

/// Validated page selection (`limit >= 1`, `count >= 1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    count: u32,
}

impl PageRequest {
    /// Returns `None` unless both values are at least 1
    pub fn new(limit: i64, count: i64) -> Option<Self> {
        let limit = u32::try_from(limit).ok().filter(|l| *l >= 1)?;
        let count = u32::try_from(count).ok().filter(|c| *c >= 1)?;
        Some(Self { limit, count })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Rows to skip before the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.count - 1) * u64::from(self.limit)
    }
}

/// Query string shared by every list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub like: Option<String>,
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_count() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}
