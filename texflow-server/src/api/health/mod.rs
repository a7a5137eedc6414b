//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/health | GET | 存活 + 数据库连通性 |
//!
//! # 响应示例
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "database": true, "uptimeSeconds": 42 }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use std::time::SystemTime;

use crate::core::ServerState;
use crate::db::DbService;
use shared::models::HealthStatus;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

/// Record the start time; call once at startup so uptime counts from boot
pub fn mark_started() {
    START_TIME.get_or_init(SystemTime::now);
}

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// 健康检查，总是 200；数据库不可用时 status 为 degraded
pub async fn health(State(state): State<ServerState>) -> Json<HealthStatus> {
    let database = DbService::ping(&state.db).await;
    Json(HealthStatus {
        status: if database { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        uptime_seconds: get_uptime_seconds(),
    })
}
