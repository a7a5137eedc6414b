//! Report Service - dashboard and payments overview

use shared::models::{InventorySummary, TransactionFilter};
use shared::summary::summarize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::{LedgerRepository, ProductRepository};
use crate::utils::AppResult;

#[derive(Clone)]
pub struct ReportService {
    products: ProductRepository,
    ledger: LedgerRepository,
    low_stock_threshold: i64,
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService")
            .field("low_stock_threshold", &self.low_stock_threshold)
            .finish()
    }
}

impl ReportService {
    pub fn new(db: Surreal<Db>, low_stock_threshold: i64) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            ledger: LedgerRepository::new(db),
            low_stock_threshold,
        }
    }

    /// Snapshot over every product and transaction
    pub async fn summary(&self) -> AppResult<InventorySummary> {
        let filter = TransactionFilter::default();
        let (products, transactions) = tokio::try_join!(
            self.products.find_all(),
            self.ledger.find_all(&filter),
        )?;
        Ok(summarize(&products, &transactions, self.low_stock_threshold))
    }
}
