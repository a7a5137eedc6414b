//! Transaction API Handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::utils::{AppJson, AppResult};
use shared::models::{Transaction, TransactionCreate, TransactionFilter};

/// GET /api/transactions - 交易列表 (?userId=&productId=&type=)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<Json<Vec<Transaction>>> {
    let transactions = state.ledger.list(&filter).await?;
    Ok(Json(transactions))
}

/// POST /api/transactions - 记账并调整库存
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<TransactionCreate>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let tx = state.ledger.record(payload).await?;
    Ok((StatusCode::CREATED, Json(tx)))
}
