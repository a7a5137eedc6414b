//! Ledger row (one recorded transaction)

use serde::{Deserialize, Serialize};
use shared::models::{PaymentStatus, ShippingInfo, Transaction, TransactionType};
use surrealdb::RecordId;

/// Stored ledger entry (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerData {
    pub tx_type: TransactionType,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub date: i64,
    pub status: PaymentStatus,
    pub entity_name: String,
    pub user_id: Option<String>,
    pub shipping: Option<ShippingInfo>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerRecord {
    pub id: RecordId,
    pub tx_type: TransactionType,
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub tax_amount: f64,
    #[serde(default)]
    pub total_amount: f64,
    pub date: i64,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub shipping: Option<ShippingInfo>,
    #[serde(default)]
    pub created_at: i64,
}

impl From<LedgerRecord> for Transaction {
    fn from(r: LedgerRecord) -> Self {
        Transaction {
            id: r.id.key().to_string(),
            tx_type: r.tx_type,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity: r.quantity,
            unit_price: r.unit_price,
            tax_amount: r.tax_amount,
            total_amount: r.total_amount,
            date: r.date,
            status: r.status,
            entity_name: r.entity_name,
            user_id: r.user_id,
            shipping: r.shipping,
            created_at: r.created_at,
        }
    }
}
