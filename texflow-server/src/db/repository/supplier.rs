//! Supplier Repository

use super::{BaseRepository, RepoError, RepoResult, new_record_id};
use crate::db::models::{SupplierData, SupplierRecord};
use shared::models::Supplier;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "supplier";

#[derive(Clone)]
pub struct SupplierRepository {
    base: BaseRepository,
}

impl SupplierRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Supplier>> {
        let rows: Vec<SupplierRecord> = self
            .base
            .db()
            .query("SELECT * FROM supplier ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Supplier>> {
        let row: Option<SupplierRecord> = self.base.db().select(id.clone()).await?;
        Ok(row.map(Supplier::from))
    }

    pub async fn create(&self, data: SupplierData) -> RepoResult<Supplier> {
        let created: Option<SupplierRecord> = self
            .base
            .db()
            .create(new_record_id(TABLE))
            .content(data)
            .await?;
        created
            .map(Supplier::from)
            .ok_or_else(|| RepoError::Database("Failed to create supplier".to_string()))
    }

    pub async fn update(&self, id: &RecordId, data: SupplierData) -> RepoResult<Supplier> {
        let rows: Vec<SupplierRecord> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("data", data))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .map(Supplier::from)
            .ok_or_else(|| RepoError::NotFound(format!("Supplier {} not found", id.key())))
    }

    /// Hard delete; `false` when nothing was there
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let removed: Option<SupplierRecord> = self.base.db().delete(id.clone()).await?;
        Ok(removed.is_some())
    }
}
