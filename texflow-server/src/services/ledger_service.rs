//! Ledger Service - records Purchases and Sales and moves stock
//!
//! # Recording order
//!
//! 1. Resolve defaults from the product (unit price, names, totals)
//! 2. Apply the stock delta under the product's lock
//!    - Sale: conditional decrement, refused if stock is short
//!    - Purchase: unconditional increment
//! 3. Append the ledger entry; if that fails, revert the delta
//!
//! Recording is not idempotent: the same payload twice yields two entries.

use std::sync::Arc;

use shared::models::{Transaction, TransactionCreate, TransactionFilter, TransactionType};
use shared::money;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::StockLocks;
use super::catalog_service::product_rid;
use crate::db::models::LedgerData;
use crate::db::repository::{LedgerRepository, ProductRepository};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, finite_or, require, validate_max_len,
};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct LedgerService {
    products: ProductRepository,
    ledger: LedgerRepository,
    locks: Arc<StockLocks>,
}

impl std::fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerService").finish_non_exhaustive()
    }
}

impl LedgerService {
    pub fn new(db: Surreal<Db>, locks: Arc<StockLocks>) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            ledger: LedgerRepository::new(db),
            locks,
        }
    }

    /// Transactions newest first (business date, then creation time)
    pub async fn list(&self, filter: &TransactionFilter) -> AppResult<Vec<Transaction>> {
        Ok(self.ledger.find_all(filter).await?)
    }

    /// Validate, apply the stock delta and append the ledger entry
    pub async fn record(&self, input: TransactionCreate) -> AppResult<Transaction> {
        let tx_type = require(input.tx_type, "type")?;
        let rid = product_rid(&require(input.product_id, "productId")?)?;
        // Canonical key: the lock, the stored entry and the cascade all use it
        let product_id = rid.key().to_string();
        // Missing, invalid and non-positive quantities all mean one unit
        let quantity = input.quantity.filter(|q| *q > 0).unwrap_or(1);
        if let Some(entity) = &input.entity_name {
            validate_max_len(entity, "entityName", MAX_NAME_LEN)?;
        }
        if let Some(shipping) = &input.shipping {
            validate_max_len(&shipping.address, "shipping.address", MAX_ADDRESS_LEN)?;
        }

        let _guard = self.locks.lock(&product_id).await;

        let product = self
            .products
            .find_by_id(&rid)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {} not found", product_id)))?;

        let default_price = match tx_type {
            TransactionType::Purchase => product.cost_price,
            TransactionType::Sale => product.selling_price,
        };
        let unit_price = finite_or(input.unit_price, default_price);
        let tax_amount = finite_or(input.tax_amount, 0.0);
        let total_amount = match input.total_amount.filter(|t| t.is_finite()) {
            Some(total) => total,
            None => money::line_total(quantity, unit_price, tax_amount)
                .ok_or_else(|| AppError::validation("totalAmount is out of range"))?,
        };

        // 1. Stock first
        let delta = tx_type.stock_delta(quantity);
        let updated = match tx_type {
            TransactionType::Sale => {
                if quantity > product.stock {
                    return Err(insufficient(&product.sku, quantity, product.stock));
                }
                self.products
                    .take_stock(&rid, quantity)
                    .await?
                    .ok_or_else(|| insufficient(&product.sku, quantity, product.stock))?
            }
            TransactionType::Purchase => {
                if product.stock.checked_add(quantity).is_none() {
                    return Err(AppError::validation("quantity is out of range"));
                }
                self.products
                    .add_stock(&rid, quantity)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(format!("Product {} not found", product_id))
                    })?
            }
        };

        // 2. Then the ledger entry
        let now = now_millis();
        let data = LedgerData {
            tx_type,
            product_id: product_id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price,
            tax_amount,
            total_amount,
            date: input.date.unwrap_or(now),
            status: input.status.unwrap_or_default(),
            entity_name: input
                .entity_name
                .unwrap_or_else(|| tx_type.default_entity_name().to_string()),
            user_id: input.user_id,
            shipping: input.shipping,
            created_at: now,
        };

        match self.ledger.create(data).await {
            Ok(tx) => {
                tracing::info!(
                    tx_id = %tx.id,
                    product_id = %product_id,
                    tx_type = ?tx_type,
                    quantity,
                    stock = updated.stock,
                    "Transaction recorded"
                );
                Ok(tx)
            }
            Err(e) => {
                // Compensate: the entry does not exist, so neither may its delta
                if let Err(revert_err) = self.products.add_stock(&rid, -delta).await {
                    tracing::error!(
                        product_id = %product_id,
                        delta,
                        error = %revert_err,
                        "Failed to revert stock after ledger write failure"
                    );
                } else {
                    tracing::warn!(product_id = %product_id, delta, "Stock delta reverted");
                }
                Err(e.into())
            }
        }
    }
}

fn insufficient(sku: &str, requested: i64, available: i64) -> AppError {
    AppError::insufficient_stock(format!(
        "Insufficient stock for {}: requested {}, available {}",
        sku, requested, available
    ))
}
