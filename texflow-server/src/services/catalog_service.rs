//! Catalog Service - product CRUD with SKU uniqueness
//!
//! Direct edits may set `stock` without a ledger entry; the report service
//! surfaces the resulting drift. Deleting a product removes its ledger
//! entries with it.

use std::sync::Arc;

use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::util::now_millis;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::StockLocks;
use crate::db::models::ProductData;
use crate::db::repository::{ProductRepository, product, record_id};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SKU_LEN, MAX_VARIANT_LEN, finite_or, validate_max_len,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct CatalogService {
    products: ProductRepository,
    locks: Arc<StockLocks>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("locked_products", &self.locks.locked_products())
            .finish()
    }
}

impl CatalogService {
    pub fn new(db: Surreal<Db>, locks: Arc<StockLocks>) -> Self {
        Self {
            products: ProductRepository::new(db),
            locks,
        }
    }

    /// All products, newest first
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        Ok(self.products.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<Product> {
        let rid = product_rid(id)?;
        self.products
            .find_by_id(&rid)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: ProductCreate) -> AppResult<Product> {
        let now = now_millis();
        let data = ProductData {
            name: input.name.unwrap_or_default().trim().to_string(),
            category: input.category.unwrap_or_default(),
            sku: input.sku.unwrap_or_default().trim().to_string(),
            variant: input.variant.unwrap_or_default(),
            cost_price: finite_or(input.cost_price, 0.0),
            selling_price: finite_or(input.selling_price, 0.0),
            stock: input.stock.unwrap_or(0),
            description: input.description.unwrap_or_default(),
            image: input.image.filter(|s| !s.is_empty()),
            created_at: now,
            updated_at: now,
        };
        validate(&data)?;

        let created = self.products.create(data).await?;
        tracing::info!(product_id = %created.id, sku = %created.sku, "Product created");
        Ok(created)
    }

    /// Merge `patch` into the stored product and re-validate the result
    pub async fn update(&self, id: &str, patch: ProductUpdate) -> AppResult<Product> {
        let rid = product_rid(id)?;
        let _guard = self.locks.lock(&rid.key().to_string()).await;

        let existing = self
            .products
            .find_by_id(&rid)
            .await?
            .ok_or_else(|| not_found(id))?;

        let mut data = ProductData::from(&existing);
        if let Some(name) = patch.name {
            data.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            data.category = category;
        }
        if let Some(sku) = patch.sku {
            data.sku = sku.trim().to_string();
        }
        if let Some(variant) = patch.variant {
            data.variant = variant;
        }
        if let Some(cost) = patch.cost_price {
            data.cost_price = finite_or(Some(cost), 0.0);
        }
        if let Some(price) = patch.selling_price {
            data.selling_price = finite_or(Some(price), 0.0);
        }
        if let Some(stock) = patch.stock {
            data.stock = stock;
        }
        if let Some(description) = patch.description {
            data.description = description;
        }
        if let Some(image) = patch.image {
            data.image = Some(image).filter(|s| !s.is_empty());
        }
        data.updated_at = now_millis();
        validate(&data)?;

        if data.stock != existing.stock {
            tracing::info!(
                product_id = %id,
                from = existing.stock,
                to = data.stock,
                "Stock set directly by catalog edit"
            );
        }

        Ok(self.products.update(&rid, data).await?)
    }

    /// Delete the product and every transaction that references it
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let rid = product_rid(id)?;
        let key = rid.key().to_string();
        let guard = self.locks.lock(&key).await;

        if self.products.find_by_id(&rid).await?.is_none() {
            return Err(not_found(id));
        }
        self.products.delete_cascade(&rid).await?;

        drop(guard);
        self.locks.forget(&key);
        tracing::info!(product_id = %id, "Product deleted with its transactions");
        Ok(())
    }
}

fn validate(data: &ProductData) -> AppResult<()> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&data.sku, "sku", MAX_SKU_LEN)?;
    validate_max_len(&data.variant, "variant", MAX_VARIANT_LEN)?;
    validate_max_len(&data.description, "description", MAX_NOTE_LEN)?;
    if data.stock < 0 {
        return Err(AppError::validation("stock must not be negative"));
    }
    Ok(())
}

pub(crate) fn product_rid(id: &str) -> AppResult<RecordId> {
    record_id(product::TABLE, id).ok_or_else(|| not_found(id))
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("Product {} not found", id))
}
