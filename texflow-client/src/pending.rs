//! 待确认写入队列
//!
//! A pending write has already been applied to the local tier and waits for
//! the server's verdict. The queue is persisted in the local tier under
//! [`PENDING_KEY`] so it survives a restart when the cache is on disk.

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::optimistic::{mentions, rewrite_ids};
use crate::resource::Resource;

/// Local tier key of the queue
pub const PENDING_KEY: &str = "texflow_pending_writes";

/// A mutation against one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum WriteOp {
    /// POST to the collection (a transaction record is a create)
    Create { body: Value },
    /// PATCH an item
    Update { id: String, patch: Value },
    /// DELETE an item
    Delete { id: String },
}

impl WriteOp {
    pub fn method(&self) -> Method {
        match self {
            Self::Create { .. } => Method::POST,
            Self::Update { .. } => Method::PATCH,
            Self::Delete { .. } => Method::DELETE,
        }
    }

    pub fn path(&self, resource: Resource) -> String {
        match self {
            Self::Create { .. } => resource.path().to_string(),
            Self::Update { id, .. } | Self::Delete { id } => resource.item_path(id),
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Create { body } => Some(body),
            Self::Update { patch, .. } => Some(patch),
            Self::Delete { .. } => None,
        }
    }

    /// Target item, for updates and deletes
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Create { .. } => None,
            Self::Update { id, .. } | Self::Delete { id } => Some(id),
        }
    }
}

/// Signed stock change a transaction record applied to a cached product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub product_id: String,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWrite {
    /// Queue entry id
    pub id: String,
    pub resource: Resource,
    pub op: WriteOp,
    /// `local-*` id minted for a create
    #[serde(default)]
    pub temp_id: Option<String>,
    /// Optimistic item inserted for a create
    #[serde(default)]
    pub draft: Option<Value>,
    /// Cached item before an update or delete, restored on rejection
    #[serde(default)]
    pub previous: Option<Value>,
    #[serde(default)]
    pub stock_adjustment: Option<StockAdjustment>,
    pub queued_at: i64,
}

impl PendingWrite {
    pub fn new(resource: Resource, op: WriteOp, queued_at: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            resource,
            op,
            temp_id: None,
            draft: None,
            previous: None,
            stock_adjustment: None,
            queued_at,
        }
    }

    /// Whether sending this entry needs `id` to exist on the server
    pub fn references(&self, id: &str) -> bool {
        self.op.target() == Some(id) || self.op.body().is_some_and(|b| mentions(b, id))
    }

    /// Swap a confirmed temporary id for the server's id
    pub fn rewrite_id(&mut self, from: &str, to: &str) {
        match &mut self.op {
            WriteOp::Create { body } => rewrite_ids(body, from, to),
            WriteOp::Update { id, patch } => {
                if id == from {
                    *id = to.to_string();
                }
                rewrite_ids(patch, from, to);
            }
            WriteOp::Delete { id } => {
                if id == from {
                    *id = to.to_string();
                }
            }
        }
        for value in [&mut self.draft, &mut self.previous].into_iter().flatten() {
            rewrite_ids(value, from, to);
        }
        if let Some(adj) = &mut self.stock_adjustment {
            if adj.product_id == from {
                adj.product_id = to.to_string();
            }
        }
    }
}

/// Outcome of one queue entry during a replay
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedWrite {
    pub entry_id: String,
    pub resource: Resource,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedWrite {
    pub entry_id: String,
    pub resource: Resource,
    pub error: shared::ErrorBody,
}

/// Result of [`crate::HybridStore::sync`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub confirmed: Vec<ConfirmedWrite>,
    pub rejected: Vec<RejectedWrite>,
    /// Entries still waiting after the replay stopped
    pub pending: usize,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.pending == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_follow_the_operation() {
        let create = WriteOp::Create { body: json!({}) };
        assert_eq!(create.method(), Method::POST);
        assert_eq!(create.path(Resource::Transactions), "/api/transactions");

        let delete = WriteOp::Delete { id: "42".into() };
        assert_eq!(delete.method(), Method::DELETE);
        assert_eq!(delete.path(Resource::Products), "/api/products/42");
        assert!(delete.body().is_none());
    }

    #[test]
    fn rewrite_touches_target_body_and_adjustment() {
        let mut sale = PendingWrite::new(
            Resource::Transactions,
            WriteOp::Create {
                body: json!({"type": "Sale", "productId": "local-p"}),
            },
            1,
        );
        sale.stock_adjustment = Some(StockAdjustment {
            product_id: "local-p".into(),
            delta: -2,
        });
        assert!(sale.references("local-p"));

        sale.rewrite_id("local-p", "9001");
        assert!(!sale.references("local-p"));
        assert_eq!(sale.op.body().unwrap()["productId"], json!("9001"));
        assert_eq!(sale.stock_adjustment.unwrap().product_id, "9001");

        let mut edit = PendingWrite::new(
            Resource::Products,
            WriteOp::Update {
                id: "local-p".into(),
                patch: json!({"stock": 4}),
            },
            2,
        );
        edit.rewrite_id("local-p", "9001");
        assert_eq!(edit.op.path(Resource::Products), "/api/products/9001");
    }

    #[test]
    fn queue_entries_persist_as_json() {
        let entry = PendingWrite::new(
            Resource::Customers,
            WriteOp::Create {
                body: json!({"name": "Asha"}),
            },
            7,
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["op"]["op"], json!("create"));
        let back: PendingWrite = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }
}
