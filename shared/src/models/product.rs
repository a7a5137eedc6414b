//! Product Model

use serde::{Deserialize, Serialize};

use super::serde_helpers::{lenient_f64, lenient_i64, lenient_string, patch_f64, patch_i64};

/// Catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Fabric,
    Towel,
    Garment,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Fabric,
        Category::Towel,
        Category::Garment,
        Category::Other,
    ];
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create product payload
///
/// Every field is optional at the serde level so that a missing name or SKU
/// surfaces as a validation error instead of a body rejection. Numeric fields
/// swallow invalid input; the catalog service falls back to 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sku: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub selling_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Update product payload (PATCH semantics, absent fields untouched)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default, deserialize_with = "patch_f64")]
    pub cost_price: Option<f64>,
    #[serde(default, deserialize_with = "patch_f64")]
    pub selling_price: Option<f64>,
    #[serde(default, deserialize_with = "patch_i64")]
    pub stock: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_serializes_camel_case() {
        let p = Product {
            id: "1".into(),
            name: "Cotton".into(),
            category: Category::Towel,
            sku: "TEX-001".into(),
            variant: String::new(),
            cost_price: 100.0,
            selling_price: 200.0,
            stock: 10,
            description: String::new(),
            image: None,
            created_at: 0,
            updated_at: 0,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["sellingPrice"], json!(200.0));
        assert_eq!(v["category"], json!("Towel"));
        assert!(v.get("image").is_none());
    }

    #[test]
    fn create_payload_tolerates_bad_numbers() {
        let c: ProductCreate = serde_json::from_value(json!({
            "name": "Towel",
            "sku": "TEX-9",
            "costPrice": "oops",
            "sellingPrice": "450",
            "stock": 12.7
        }))
        .unwrap();
        assert_eq!(c.cost_price, None);
        assert_eq!(c.selling_price, Some(450.0));
        assert_eq!(c.stock, Some(12));
    }
}
