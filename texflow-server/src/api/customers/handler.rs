//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::utils::{AppJson, AppResult};
use shared::models::{Customer, CustomerCreate, CustomerUpdate};

/// GET /api/customers - 获取所有客户
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(state.parties.list_customers().await?))
}

/// POST /api/customers - 创建客户
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CustomerCreate>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = state.parties.create_customer(payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// PATCH /api/customers/:id - 更新客户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    Ok(Json(state.parties.update_customer(&id, payload).await?))
}

/// DELETE /api/customers/:id - 删除客户
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.parties.delete_customer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
