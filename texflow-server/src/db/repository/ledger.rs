//! Ledger Repository
//!
//! Append-only: entries are created and listed, never edited. They are only
//! removed together with their product (see `ProductRepository::delete_cascade`).

use super::{BaseRepository, RepoError, RepoResult, new_record_id};
use crate::db::models::{LedgerData, LedgerRecord};
use shared::models::{Transaction, TransactionFilter};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "ledger";

#[derive(Clone)]
pub struct LedgerRepository {
    base: BaseRepository,
}

impl LedgerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Entries matching `filter`, newest business date first
    pub async fn find_all(&self, filter: &TransactionFilter) -> RepoResult<Vec<Transaction>> {
        let mut conditions = Vec::new();
        if filter.user_id.is_some() {
            conditions.push("user_id = $user_id");
        }
        if filter.product_id.is_some() {
            conditions.push("product_id = $product_id");
        }
        if filter.tx_type.is_some() {
            conditions.push("tx_type = $tx_type");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!("SELECT * FROM ledger{where_clause} ORDER BY date DESC, created_at DESC");
        let mut query = self.base.db().query(sql);
        if let Some(user_id) = filter.user_id.clone() {
            query = query.bind(("user_id", user_id));
        }
        if let Some(product_id) = filter.product_id.clone() {
            query = query.bind(("product_id", product_id));
        }
        if let Some(tx_type) = filter.tx_type {
            query = query.bind(("tx_type", tx_type));
        }

        let rows: Vec<LedgerRecord> = query.await?.take(0)?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    /// Append an entry
    pub async fn create(&self, data: LedgerData) -> RepoResult<Transaction> {
        let created: Option<LedgerRecord> = self
            .base
            .db()
            .create(new_record_id(TABLE))
            .content(data)
            .await?;
        created
            .map(Transaction::from)
            .ok_or_else(|| RepoError::Database("Failed to record transaction".to_string()))
    }
}
