//! 请求日志中间件
//!
//! 每个请求一条完成日志: 请求 ID、路由、状态码、耗时和请求体大小。
//! 健康检查只在 debug 级别记录。

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use http::header::CONTENT_LENGTH;

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_owned();
    let body_bytes = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        tracing::error!(%request_id, %method, %route, status, latency_ms, body_bytes, "Request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%request_id, %method, %route, status, latency_ms, body_bytes, "Request rejected");
    } else if route == "/api/health" {
        tracing::debug!(%request_id, status, latency_ms, "Health check");
    } else {
        tracing::info!(%request_id, %method, %route, status, latency_ms, body_bytes, "Request served");
    }

    response
}
