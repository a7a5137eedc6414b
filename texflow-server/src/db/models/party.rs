//! Supplier / Customer rows

use serde::{Deserialize, Serialize};
use shared::models::{Customer, Supplier};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierData {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupplierRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: i64,
}

impl From<SupplierRecord> for Supplier {
    fn from(r: SupplierRecord) -> Self {
        Supplier {
            id: r.id.key().to_string(),
            name: r.name,
            contact: r.contact,
            email: r.email,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerData {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: i64,
}

impl From<CustomerRecord> for Customer {
    fn from(r: CustomerRecord) -> Self {
        Customer {
            id: r.id.key().to_string(),
            name: r.name,
            phone: r.phone,
            email: r.email,
            created_at: r.created_at,
        }
    }
}
