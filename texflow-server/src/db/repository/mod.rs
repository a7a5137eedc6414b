//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod customer;
pub mod ledger;
pub mod product;
pub mod supplier;

pub use customer::CustomerRepository;
pub use ledger::LedgerRepository;
pub use product::ProductRepository;
pub use supplier::SupplierRepository;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention
// =============================================================================
//
// 记录键为 snowflake i64，API 只暴露纯键字符串：
//   - 创建: new_record_id("product")
//   - 解析: record_id("product", "123") -> Some(product:123)
//   - 获取纯ID: id.key().to_string()
//
// 无法解析为 i64 的路径 id 视为不存在 (404)

/// Parse a wire id into a record id for `table`
pub fn record_id(table: &str, id: &str) -> Option<RecordId> {
    id.trim()
        .parse::<i64>()
        .ok()
        .map(|key| RecordId::from_table_key(table, key))
}

/// Fresh record id with a snowflake key
pub fn new_record_id(table: &str) -> RecordId {
    RecordId::from_table_key(table, shared::util::snowflake_id())
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_ids_do_not_parse() {
        assert!(record_id("product", "local-abc").is_none());
        assert!(record_id("product", "").is_none());
        let id = record_id("product", " 42 ").unwrap();
        assert_eq!(id.key().to_string(), "42");
        assert_eq!(id.table(), "product");
    }
}
