//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, new_record_id};
use crate::db::models::{ProductData, ProductRecord};
use shared::models::Product;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let rows: Vec<ProductRecord> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Find product by record id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Product>> {
        let row: Option<ProductRecord> = self.base.db().select(id.clone()).await?;
        Ok(row.map(Product::from))
    }

    /// Find product by SKU
    pub async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        let sku_owned = sku.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE sku = $sku LIMIT 1")
            .bind(("sku", sku_owned))
            .await?;
        let rows: Vec<ProductRecord> = result.take(0)?;
        Ok(rows.into_iter().next().map(Product::from))
    }

    /// Create a new product
    pub async fn create(&self, data: ProductData) -> RepoResult<Product> {
        // Check duplicate SKU
        if self.find_by_sku(&data.sku).await?.is_some() {
            return Err(duplicate_sku(&data.sku));
        }

        let sku = data.sku.clone();
        let created: Option<ProductRecord> = self
            .base
            .db()
            .create(new_record_id(TABLE))
            .content(data)
            .await
            .map_err(|e| map_write_error(e, &sku))?;
        created
            .map(Product::from)
            .ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Replace a product's fields with the merged record
    pub async fn update(&self, id: &RecordId, data: ProductData) -> RepoResult<Product> {
        // Check duplicate SKU against other products
        if let Some(other) = self.find_by_sku(&data.sku).await?
            && other.id != id.key().to_string()
        {
            return Err(duplicate_sku(&data.sku));
        }

        let sku = data.sku.clone();
        let rows: Vec<ProductRecord> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("data", data))
            .await
            .and_then(|mut r| r.take(0))
            .map_err(|e| map_write_error(e, &sku))?;

        rows.into_iter()
            .next()
            .map(Product::from)
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id.key())))
    }

    /// Add `delta` to stock unconditionally
    ///
    /// Returns `None` when the product does not exist.
    pub async fn add_stock(&self, id: &RecordId, delta: i64) -> RepoResult<Option<Product>> {
        let rows: Vec<ProductRecord> = self
            .base
            .db()
            .query("UPDATE $thing SET stock += $delta, updated_at = $now RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("delta", delta))
            .bind(("now", shared::util::now_millis()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(Product::from))
    }

    /// Remove `quantity` from stock only if that much is on hand
    ///
    /// Returns `None` when the product does not exist or stock is short;
    /// stock is unchanged in both cases.
    pub async fn take_stock(&self, id: &RecordId, quantity: i64) -> RepoResult<Option<Product>> {
        let rows: Vec<ProductRecord> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET stock -= $qty, updated_at = $now \
                 WHERE stock >= $qty RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("qty", quantity))
            .bind(("now", shared::util::now_millis()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(Product::from))
    }

    /// Delete a product together with its ledger entries (single store transaction)
    pub async fn delete_cascade(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 DELETE ledger WHERE product_id = $pid; \
                 DELETE $thing; \
                 COMMIT TRANSACTION;",
            )
            .bind(("pid", id.key().to_string()))
            .bind(("thing", id.clone()))
            .await?
            .check()?;
        Ok(())
    }
}

fn duplicate_sku(sku: &str) -> RepoError {
    RepoError::Duplicate(format!("Product with SKU '{}' already exists", sku))
}

/// Unique-index violations surface as Duplicate
fn map_write_error(err: surrealdb::Error, sku: &str) -> RepoError {
    let msg = err.to_string();
    if msg.contains("product_sku") || msg.contains("already contains") {
        duplicate_sku(sku)
    } else {
        RepoError::Database(msg)
    }
}
