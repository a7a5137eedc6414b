//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult, new_record_id};
use crate::db::models::{CustomerData, CustomerRecord};
use shared::models::Customer;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "customer";

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Customer>> {
        let rows: Vec<CustomerRecord> = self
            .base
            .db()
            .query("SELECT * FROM customer ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Customer>> {
        let row: Option<CustomerRecord> = self.base.db().select(id.clone()).await?;
        Ok(row.map(Customer::from))
    }

    pub async fn create(&self, data: CustomerData) -> RepoResult<Customer> {
        let created: Option<CustomerRecord> = self
            .base
            .db()
            .create(new_record_id(TABLE))
            .content(data)
            .await?;
        created
            .map(Customer::from)
            .ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    pub async fn update(&self, id: &RecordId, data: CustomerData) -> RepoResult<Customer> {
        let rows: Vec<CustomerRecord> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("data", data))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .map(Customer::from)
            .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", id.key())))
    }

    /// Hard delete; `false` when nothing was there
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let removed: Option<CustomerRecord> = self.base.db().delete(id.clone()).await?;
        Ok(removed.is_some())
    }
}
