use std::sync::Arc;

use async_trait::async_trait;
use catalog_db::RepositoryError;
use chrono::{DateTime, Utc};

use super::models::{Product, ProductDraft};

/// Filter and window for a list request, already normalised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive substring matched against name and description
    pub search: Option<String>,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl ListQuery {
    /// Build a query; blank searches mean "everything" and page values below 1 become 1
    pub fn new(search: Option<String>, page: u32, page_size: u32) -> Self {
        Self {
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Rows to skip before the window starts
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// One window of a filtered, id-ordered result set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the whole filtered set, independent of the window
    pub total_count: u64,
}

/// Persistence boundary for products.
///
/// Each method is a single atomic operation against one record (or one
/// consistent read for `list`).
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<Product>, RepositoryError>;

    async fn get(&self, id: i64) -> Result<Option<Product>, RepositoryError>;

    /// Persist a new product; the store assigns the id and both timestamps are `now`
    async fn insert(&self, draft: &ProductDraft, now: DateTime<Utc>)
        -> Result<Product, RepositoryError>;

    /// Overwrite the mutable fields of `id`. `Ok(None)` means no such row.
    async fn update(
        &self,
        id: i64,
        draft: &ProductDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Hard delete; `false` when nothing was removed
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;
}

pub type SharedStore = Arc<dyn ProductStore>;
