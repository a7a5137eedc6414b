//! Ledger Transaction Model

use serde::{Deserialize, Serialize};

use super::serde_helpers::{lenient_f64, lenient_i64, lenient_string};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Purchase,
    Sale,
}

impl TransactionType {
    /// Signed stock delta for `quantity` units
    pub fn stock_delta(&self, quantity: i64) -> i64 {
        match self {
            Self::Purchase => quantity,
            Self::Sale => quantity.saturating_neg(),
        }
    }

    /// Counterparty name used when the caller does not supply one
    pub fn default_entity_name(&self) -> &'static str {
        match self {
            Self::Purchase => "Supplier",
            Self::Sale => "Walk-in Customer",
        }
    }
}

/// Settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    Pending,
    #[default]
    Paid,
}

/// Delivery details captured by the storefront
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub phone: String,
}

/// Recorded ledger entry (immutable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
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
    /// Business date (Unix millis)
    pub date: i64,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub entity_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingInfo>,
    #[serde(default)]
    pub created_at: i64,
}

/// Record transaction payload
///
/// Only `type` and `productId` are required; everything else has a server-side
/// default (see the ledger service).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreate {
    #[serde(rename = "type", default)]
    pub tx_type: Option<TransactionType>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tax_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub date: Option<i64>,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub entity_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub shipping: Option<ShippingInfo>,
}

impl TransactionCreate {
    pub fn sale(product_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            tx_type: Some(TransactionType::Sale),
            product_id: Some(product_id.into()),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    pub fn purchase(product_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            tx_type: Some(TransactionType::Purchase),
            product_id: Some(product_id.into()),
            quantity: Some(quantity),
            ..Default::default()
        }
    }
}

/// Query filters for `GET /api/transactions`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: Option<TransactionType>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.user_id
            .as_ref()
            .is_none_or(|u| tx.user_id.as_ref() == Some(u))
            && self.product_id.as_ref().is_none_or(|p| &tx.product_id == p)
            && self.tx_type.is_none_or(|t| tx.tx_type == t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stock_delta_sign_follows_type() {
        assert_eq!(TransactionType::Purchase.stock_delta(4), 4);
        assert_eq!(TransactionType::Sale.stock_delta(4), -4);
    }

    #[test]
    fn create_payload_reads_type_field() {
        let c: TransactionCreate = serde_json::from_value(json!({
            "type": "Sale",
            "productId": 42,
            "quantity": "3"
        }))
        .unwrap();
        assert_eq!(c.tx_type, Some(TransactionType::Sale));
        assert_eq!(c.product_id.as_deref(), Some("42"));
        assert_eq!(c.quantity, Some(3));
        assert!(c.status.is_none());
    }

    #[test]
    fn filter_matches_on_all_given_fields() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "1", "type": "Sale", "productId": "p1", "quantity": 1,
            "date": 0, "userId": "u1"
        }))
        .unwrap();
        assert!(TransactionFilter::default().matches(&tx));
        let by_user = TransactionFilter {
            user_id: Some("u1".into()),
            tx_type: Some(TransactionType::Sale),
            ..Default::default()
        };
        assert!(by_user.matches(&tx));
        let other = TransactionFilter {
            product_id: Some("p2".into()),
            ..Default::default()
        };
        assert!(!other.matches(&tx));
    }
}
