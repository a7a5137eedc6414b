//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::utils::{AppJson, AppResult};
use shared::models::{Product, ProductCreate, ProductUpdate};

/// GET /api/products - 获取所有商品 (最新优先)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.catalog.list().await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state.catalog.get(&id).await?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.catalog.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /api/products/:id - 更新商品 (部分字段)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let product = state.catalog.update(&id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/products/:id - 删除商品及其交易记录
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.catalog.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
