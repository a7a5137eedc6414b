//! Shared helpers for router-level tests
//!
//! Every test gets its own in-memory SurrealDB and drives the fully layered
//! router through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use texflow_server::{Config, ServerState, build_app};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let state = ServerState::in_memory(config)
            .await
            .expect("in-memory database");
        let router = build_app(&state).with_state(state.clone());
        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("oneshot");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a product and return its id
    pub async fn create_product(&self, sku: &str, stock: i64, cost: f64, price: f64) -> String {
        let (status, body) = self
            .post(
                "/api/products",
                json!({
                    "name": format!("Product {sku}"),
                    "sku": sku,
                    "category": "Fabric",
                    "costPrice": cost,
                    "sellingPrice": price,
                    "stock": stock
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create {sku}: {body}");
        body["id"].as_str().expect("id").to_string()
    }

    pub async fn stock_of(&self, id: &str) -> i64 {
        let (status, body) = self.get(&format!("/api/products/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        body["stock"].as_i64().expect("stock")
    }
}

pub fn test_config() -> Config {
    Config::with_overrides(std::env::temp_dir().to_string_lossy().to_string(), 0)
}
