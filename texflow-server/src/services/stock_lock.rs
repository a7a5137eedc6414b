//! Per-product stock locks
//!
//! Every stock mutation for a product (ledger recording, catalog edits,
//! deletion) runs while holding that product's lock. Different products never
//! contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct StockLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl StockLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `product_id`'s stock
    pub async fn lock(&self, product_id: &str) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the map shard is not held across the await
        let mutex = self
            .locks
            .entry(product_id.to_string())
            .or_default()
            .clone();
        mutex.lock_owned().await
    }

    /// Drop the lock entry of a deleted product
    pub fn forget(&self, product_id: &str) {
        self.locks.remove(product_id);
    }

    /// Products that currently have a lock entry
    pub fn locked_products(&self) -> usize {
        self.locks.len()
    }
}
