mod common;

use axum::body::Body;
use common::{TestApp, test_config};
use http::{Request, StatusCode};
use serde_json::json;

#[tokio::test]
async fn created_product_is_listed_newest_first() {
    let app = TestApp::new().await;
    let first = app.create_product("TEX-001", 10, 100.0, 200.0).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = app.create_product("TEX-002", 5, 50.0, 90.0).await;

    let (status, body) = app.get("/api/products").await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], json!(second));
    assert_eq!(list[1]["id"], json!(first));
    assert_eq!(list[1]["sku"], json!("TEX-001"));
    assert_eq!(list[1]["sellingPrice"], json!(200.0));
    assert!(list[1]["createdAt"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn duplicate_sku_is_a_conflict() {
    let app = TestApp::new().await;
    app.create_product("TEX-001", 10, 100.0, 200.0).await;

    let (status, body) = app
        .post("/api/products", json!({"name": "Other", "sku": "TEX-001"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("E0004"));

    let (_, list) = app.get("/api/products").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_name_or_sku_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/products", json!({"sku": "TEX-9"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("E0002"));

    let (status, _) = app
        .post("/api/products", json!({"name": "Towel", "sku": "   "}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/products", json!({"name": "Towel", "sku": "TEX-9", "stock": -2}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_numbers_default_to_zero() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/products",
            json!({"name": "Towel", "sku": "TEX-9", "costPrice": "abc", "sellingPrice": "450", "stock": "12"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["costPrice"], json!(0.0));
    assert_eq!(body["sellingPrice"], json!(450.0));
    assert_eq!(body["stock"], json!(12));
    assert_eq!(body["category"], json!("Fabric"));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/products/123456").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("E0003"));

    let (status, _) = app.get("/api/products/not-a-number").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.patch("/api/products/42", json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/api/products/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_merges_and_revalidates() {
    let app = TestApp::new().await;
    let id = app.create_product("TEX-001", 10, 100.0, 200.0).await;
    app.create_product("TEX-002", 1, 1.0, 2.0).await;

    let (status, body) = app
        .patch(
            &format!("/api/products/{id}"),
            json!({"sellingPrice": 250, "variant": "Red / 50m"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sellingPrice"], json!(250.0));
    assert_eq!(body["variant"], json!("Red / 50m"));
    assert_eq!(body["sku"], json!("TEX-001"));
    assert_eq!(body["stock"], json!(10));

    let (status, _) = app
        .patch(&format!("/api/products/{id}"), json!({"sku": "TEX-002"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .patch(&format!("/api/products/{id}"), json!({"name": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Keeping its own SKU is not a conflict
    let (status, _) = app
        .patch(&format!("/api/products/{id}"), json!({"sku": "TEX-001"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    // a present but unreadable number is re-coerced to 0
    let (status, body) = app
        .patch(&format!("/api/products/{id}"), json!({"costPrice": "n/a"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["costPrice"], json!(0.0));
    assert_eq!(body["sellingPrice"], json!(250.0));
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("E0002"));
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let mut config = test_config();
    config.max_body_bytes = 1024;
    let app = TestApp::with_config(config).await;

    let image = format!("data:image/png;base64,{}", "A".repeat(4096));
    let (status, body) = app
        .post(
            "/api/products",
            json!({"name": "Big", "sku": "TEX-BIG", "image": image}),
        )
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], json!("E0008"));
}

#[tokio::test]
async fn inline_image_within_limit_is_stored() {
    let app = TestApp::new().await;
    let image = format!("data:image/png;base64,{}", "A".repeat(64 * 1024));
    let (status, body) = app
        .post(
            "/api/products",
            json!({"name": "Pic", "sku": "TEX-PIC", "image": image.clone()}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["image"], json!(image));
}

#[tokio::test]
async fn health_reports_database() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!(true));
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    use tower::ServiceExt;

    let app = TestApp::new().await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
