//! Supplier API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::utils::{AppJson, AppResult};
use shared::models::{Supplier, SupplierCreate, SupplierUpdate};

/// GET /api/suppliers - 获取所有供应商
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Supplier>>> {
    Ok(Json(state.parties.list_suppliers().await?))
}

/// POST /api/suppliers - 创建供应商
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<SupplierCreate>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let supplier = state.parties.create_supplier(payload).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// PATCH /api/suppliers/:id - 更新供应商
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<SupplierUpdate>,
) -> AppResult<Json<Supplier>> {
    Ok(Json(state.parties.update_supplier(&id, payload).await?))
}

/// DELETE /api/suppliers/:id - 删除供应商
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.parties.delete_supplier(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
