//! 乐观更新 - 缓存集合上的纯函数
//!
//! Every cached resource is a JSON array of objects carrying an `"id"`.
//! Nothing here touches the network or the local tier.

use serde_json::{Map, Value, json};
use shared::models::serde_helpers::{coerce_f64, coerce_i64};
use shared::models::{PaymentStatus, TransactionType};
use shared::money;

/// Prefix of ids minted by the client before the server confirms a create
pub const TEMP_ID_PREFIX: &str = "local-";

pub fn new_temp_id() -> String {
    format!("{TEMP_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

/// Cached collection as a vector; anything that is not an array reads as empty
pub fn items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

pub fn item_id(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str)
}

pub fn find<'a>(items: &'a [Value], id: &str) -> Option<&'a Value> {
    items.iter().find(|item| item_id(item) == Some(id))
}

/// Drop top-level `null` fields so they do not clobber cached values
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => other,
    }
}

/// Newest first, matching the server's list order
pub fn insert_front(items: &mut Vec<Value>, item: Value) {
    items.insert(0, item);
}

/// Replace the item with `id`; returns false when it is not cached
pub fn replace(items: &mut [Value], id: &str, item: Value) -> bool {
    match items.iter_mut().find(|i| item_id(i) == Some(id)) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}

pub fn remove(items: &mut Vec<Value>, id: &str) -> Option<Value> {
    let pos = items.iter().position(|i| item_id(i) == Some(id))?;
    Some(items.remove(pos))
}

/// Shallow merge of `patch` into `item`
pub fn merge(item: &mut Value, patch: &Value) {
    if let (Value::Object(target), Value::Object(fields)) = (item, patch) {
        for (key, value) in fields {
            if !value.is_null() {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Replace every string equal to `from` with `to`, at any depth
pub fn rewrite_ids(value: &mut Value, from: &str, to: &str) {
    match value {
        Value::String(s) if s == from => *s = to.to_string(),
        Value::Array(items) => items.iter_mut().for_each(|v| rewrite_ids(v, from, to)),
        Value::Object(map) => map.values_mut().for_each(|v| rewrite_ids(v, from, to)),
        _ => {}
    }
}

/// Whether any string inside `value` equals `id`
pub fn mentions(value: &Value, id: &str) -> bool {
    match value {
        Value::String(s) => s == id,
        Value::Array(items) => items.iter().any(|v| mentions(v, id)),
        Value::Object(map) => map.values().any(|v| mentions(v, id)),
        _ => false,
    }
}

/// Apply a signed stock delta to a cached product
pub fn adjust_stock(products: &mut [Value], product_id: &str, delta: i64) -> bool {
    let Some(product) = products
        .iter_mut()
        .find(|p| item_id(p) == Some(product_id))
    else {
        return false;
    };
    let stock = product.get("stock").and_then(coerce_i64).unwrap_or(0);
    if let Value::Object(map) = product {
        map.insert("stock".into(), json!(stock.saturating_add(delta)));
    }
    true
}

/// Product as shown before the server confirms it
pub fn draft_item(body: &Value, id: &str, now: i64) -> Value {
    let mut map = match strip_nulls(body.clone()) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    map.insert("id".into(), json!(id));
    map.entry("createdAt").or_insert(json!(now));
    map.entry("updatedAt").or_insert(json!(now));
    Value::Object(map)
}

/// Ledger entry as the server would record it, filled from the cached product
///
/// Returns the draft and its stock delta. Mirrors the server defaults:
/// quantity below 1 becomes 1, the unit price falls back to the product's
/// cost (Purchase) or selling (Sale) price, tax to 0, total to
/// `quantity × unitPrice + tax`.
pub fn draft_transaction(
    body: &Value,
    products: &[Value],
    id: &str,
    now: i64,
) -> Option<(Value, String, i64)> {
    let tx_type: TransactionType = serde_json::from_value(body.get("type")?.clone()).ok()?;
    let product_id = body.get("productId")?.as_str()?.to_string();
    let product = find(products, &product_id);

    let quantity = body
        .get("quantity")
        .and_then(coerce_i64)
        .filter(|q| *q > 0)
        .unwrap_or(1);
    let price_field = match tx_type {
        TransactionType::Purchase => "costPrice",
        TransactionType::Sale => "sellingPrice",
    };
    let unit_price = body
        .get("unitPrice")
        .and_then(coerce_f64)
        .or_else(|| product.and_then(|p| p.get(price_field)).and_then(coerce_f64))
        .unwrap_or(0.0);
    let tax_amount = body.get("taxAmount").and_then(coerce_f64).unwrap_or(0.0);
    let total_amount = body
        .get("totalAmount")
        .and_then(coerce_f64)
        .or_else(|| money::line_total(quantity, unit_price, tax_amount))
        .unwrap_or(0.0);
    let product_name = product
        .and_then(|p| p.get("name"))
        .cloned()
        .unwrap_or_else(|| json!(""));
    let status = body
        .get("status")
        .filter(|s| !s.is_null())
        .cloned()
        .unwrap_or_else(|| json!(PaymentStatus::Paid));
    let entity_name = body
        .get("entityName")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(tx_type.default_entity_name());

    let mut draft = json!({
        "id": id,
        "type": tx_type,
        "productId": product_id,
        "productName": product_name,
        "quantity": quantity,
        "unitPrice": unit_price,
        "taxAmount": tax_amount,
        "totalAmount": total_amount,
        "date": body.get("date").and_then(coerce_i64).unwrap_or(now),
        "status": status,
        "entityName": entity_name,
        "createdAt": now,
    });
    if let Value::Object(map) = &mut draft {
        for key in ["userId", "shipping"] {
            if let Some(v) = body.get(key).filter(|v| !v.is_null()) {
                map.insert(key.into(), v.clone());
            }
        }
    }
    Some((draft, product_id, tx_type.stock_delta(quantity)))
}
