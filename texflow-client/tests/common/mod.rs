//! Scripted stand-in for the TexFlow server
//!
//! Keeps products and transactions in memory, enforces the stock rule on
//! Sales and can be switched offline or slowed down.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use http::Method;
use serde_json::{Value, json};
use texflow_client::{ClientError, ClientResult, RemoteTier};

pub struct FakeServer {
    online: AtomicBool,
    delay: Mutex<Option<Duration>>,
    /// Delay after a write is applied, before its reply is returned
    reply_delay: Mutex<Option<Duration>>,
    next_id: AtomicU64,
    pub products: Mutex<Vec<Value>>,
    pub transactions: Mutex<Vec<Value>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeServer {
    pub fn online() -> Self {
        Self {
            online: AtomicBool::new(true),
            delay: Mutex::new(None),
            reply_delay: Mutex::new(None),
            next_id: AtomicU64::new(1),
            products: Mutex::new(Vec::new()),
            transactions: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn offline() -> Self {
        let server = Self::online();
        server.set_online(false);
        server
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn set_reply_delay(&self, delay: Duration) {
        *self.reply_delay.lock().unwrap() = Some(delay);
    }

    pub fn with_product(self, id: &str, sku: &str, stock: i64, price: f64) -> Self {
        self.products.lock().unwrap().push(json!({
            "id": id,
            "name": format!("Product {sku}"),
            "category": "Fabric",
            "sku": sku,
            "costPrice": price / 2.0,
            "sellingPrice": price,
            "stock": stock,
        }));
        self
    }

    pub fn stock_of(&self, id: &str) -> Option<i64> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p["id"] == json!(id))
            .and_then(|p| p["stock"].as_i64())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn mint_id(&self) -> String {
        format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn record_sale_or_purchase(&self, body: &Value) -> ClientResult<Value> {
        let product_id = body["productId"].as_str().unwrap_or_default();
        let quantity = body["quantity"].as_i64().unwrap_or(1).max(1);
        let mut products = self.products.lock().unwrap();
        let Some(product) = products.iter_mut().find(|p| p["id"] == json!(product_id)) else {
            return Err(rejection(404, "E0003", "Product not found"));
        };
        let stock = product["stock"].as_i64().unwrap_or(0);
        let delta = match body["type"].as_str() {
            Some("Sale") if quantity > stock => {
                return Err(rejection(
                    400,
                    "E0007",
                    &format!(
                        "Insufficient stock for {}: requested {quantity}, available {stock}",
                        product["sku"].as_str().unwrap_or_default()
                    ),
                ));
            }
            Some("Sale") => -quantity,
            Some("Purchase") => quantity,
            _ => return Err(rejection(400, "E0002", "type is required")),
        };
        product["stock"] = json!(stock + delta);

        let mut tx = body.clone();
        tx["id"] = json!(self.mint_id());
        tx["productName"] = product["name"].clone();
        tx["quantity"] = json!(quantity);
        if tx.get("date").is_none() {
            tx["date"] = json!(1);
        }
        self.transactions.lock().unwrap().insert(0, tx.clone());
        Ok(tx)
    }
}

pub fn rejection(status: u16, code: &str, message: &str) -> ClientError {
    ClientError::Api {
        status,
        code: code.to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl RemoteTier for FakeServer {
    async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Value> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if !self.online.load(Ordering::SeqCst) {
            return Err(ClientError::Http("connection refused".into()));
        }
        self.calls.lock().unwrap().push(format!("{method} {path}"));

        let body = body.cloned().unwrap_or(Value::Null);
        let result = self.route(&method, path, body);

        let reply_delay = *self.reply_delay.lock().unwrap();
        if let Some(delay) = reply_delay.filter(|_| method != Method::GET) {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

impl FakeServer {
    fn route(&self, method: &Method, path: &str, body: Value) -> ClientResult<Value> {
        match (method, path) {
            (&Method::GET, "/api/products") => Ok(Value::Array(self.products.lock().unwrap().clone())),
            (&Method::GET, "/api/transactions") => {
                Ok(Value::Array(self.transactions.lock().unwrap().clone()))
            }
            (&Method::GET, "/api/suppliers") | (&Method::GET, "/api/customers") => Ok(json!([])),
            (&Method::POST, "/api/products") => {
                let mut product = body;
                product["id"] = json!(self.mint_id());
                if product.get("stock").is_none() {
                    product["stock"] = json!(0);
                }
                self.products.lock().unwrap().insert(0, product.clone());
                Ok(product)
            }
            (&Method::POST, "/api/transactions") => self.record_sale_or_purchase(&body),
            _ => Err(rejection(404, "E0003", "Not found")),
        }
    }
}
