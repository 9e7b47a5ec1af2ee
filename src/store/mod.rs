//! Content storage behind the query layer.
//!
//! Rows travel as JSON objects (`Record`); typed decoding happens in the
//! resource layer. Two implementations share the `ContentStore` contract:
//! `PgStore` for deployments and `MemoryStore` for development and tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::query::{ListQuery, PageRequest, Relation};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One stored row as a JSON object.
pub type Record = Map<String, Value>;

/// A page of rows plus the total number of matching rows.
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub records: Vec<Record>,
    pub total: u64,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Execute a composed list query, returning one page.
    async fn fetch_page(&self, query: &ListQuery, page: PageRequest) -> Result<RecordPage>;

    async fn find(&self, table: &str, id: i64) -> Result<Option<Record>>;

    /// Child rows of `parent_id`, ordered by the relation's order column.
    async fn related(&self, relation: &Relation, parent_id: i64) -> Result<Vec<Record>>;

    /// Insert a row; the store assigns `id` and `created_at`.
    async fn insert(&self, table: &str, record: Record) -> Result<Record>;

    /// Merge `patch` into an existing row; `None` if the row does not exist.
    async fn update(&self, table: &str, id: i64, patch: Record) -> Result<Option<Record>>;

    /// `true` if a row was deleted.
    async fn delete(&self, table: &str, id: i64) -> Result<bool>;
}

/// Numeric id of a record, accepting numbers and numeric strings.
pub fn record_id(record: &Record) -> Option<i64> {
    match record.get("id")? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
