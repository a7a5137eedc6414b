//! Report API 模块

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::InventorySummary;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/reports/summary", get(summary))
}

/// GET /api/reports/summary - 仪表盘 + 应收应付汇总
pub async fn summary(State(state): State<ServerState>) -> AppResult<Json<InventorySummary>> {
    Ok(Json(state.reports.summary().await?))
}
