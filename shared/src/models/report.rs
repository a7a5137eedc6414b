//! Report / Health Models

use serde::{Deserialize, Serialize};

use super::product::Category;

/// A product at or below the low-stock threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub stock: i64,
}

/// Sales revenue attributed to one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: String,
    pub name: String,
    pub sales: f64,
}

/// Units on hand per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStock {
    pub category: Category,
    pub stock: i64,
}

/// Product whose stock counter disagrees with the ledger
///
/// Direct catalog edits can set stock without a transaction; this makes the
/// divergence visible instead of silently trusting either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDrift {
    pub product_id: String,
    pub name: String,
    pub stock: i64,
    /// Purchases minus sales recorded for this product
    pub ledger_net: i64,
}

/// Dashboard and payments overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub product_count: usize,
    pub transaction_count: usize,
    /// Σ stock × costPrice
    pub inventory_value: f64,
    pub low_stock_threshold: i64,
    pub low_stock: Vec<LowStockItem>,
    pub total_sales: f64,
    pub total_purchases: f64,
    /// Pending sales (money owed to us)
    pub pending_receivable: f64,
    /// Pending purchases (money we owe)
    pub pending_payable: f64,
    pub sales_by_product: Vec<ProductSales>,
    pub stock_by_category: Vec<CategoryStock>,
    pub ledger_drift: Vec<LedgerDrift>,
}

/// `GET /api/health` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// "ok" when the store answers, "degraded" otherwise
    pub status: String,
    pub version: String,
    pub database: bool,
    pub uptime_seconds: u64,
}
