//! Product row

use serde::{Deserialize, Serialize};
use shared::models::{Category, Product};
use surrealdb::RecordId;

/// Stored product document (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductData {
    pub name: String,
    pub category: Category,
    pub sku: String,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub cost_price: f64,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Product row as returned by the store
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub category: Category,
    pub sku: String,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub cost_price: f64,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        Product {
            id: r.id.key().to_string(),
            name: r.name,
            category: r.category,
            sku: r.sku,
            variant: r.variant,
            cost_price: r.cost_price,
            selling_price: r.selling_price,
            stock: r.stock,
            description: r.description,
            image: r.image,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<&Product> for ProductData {
    fn from(p: &Product) -> Self {
        ProductData {
            name: p.name.clone(),
            category: p.category,
            sku: p.sku.clone(),
            variant: p.variant.clone(),
            cost_price: p.cost_price,
            selling_price: p.selling_price,
            stock: p.stock,
            description: p.description.clone(),
            image: p.image.clone(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
