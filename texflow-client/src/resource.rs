//! Cached resources

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::seed;

/// A collection the client mirrors locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Products,
    Transactions,
    Suppliers,
    Customers,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Products,
        Resource::Transactions,
        Resource::Suppliers,
        Resource::Customers,
    ];

    /// Collection path on the server
    pub fn path(&self) -> &'static str {
        match self {
            Self::Products => "/api/products",
            Self::Transactions => "/api/transactions",
            Self::Suppliers => "/api/suppliers",
            Self::Customers => "/api/customers",
        }
    }

    /// Path of a single item
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path(), id)
    }

    /// Local tier key
    pub fn cache_key(&self) -> &'static str {
        match self {
            Self::Products => "texflow_fallback_products",
            Self::Transactions => "texflow_fallback_transactions",
            Self::Suppliers => "texflow_fallback_suppliers",
            Self::Customers => "texflow_fallback_customers",
        }
    }

    /// Returned when neither the server nor the cache can answer
    pub fn seed(&self) -> Value {
        match self {
            Self::Products => seed::products(),
            Self::Transactions => Value::Array(Vec::new()),
            Self::Suppliers => seed::suppliers(),
            Self::Customers => seed::customers(),
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Products => "products",
            Self::Transactions => "transactions",
            Self::Suppliers => "suppliers",
            Self::Customers => "customers",
        };
        f.write_str(name)
    }
}
