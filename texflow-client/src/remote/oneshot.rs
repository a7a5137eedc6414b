// texflow-client/src/remote/oneshot.rs
// Oneshot Remote tier - 内存通信
//
// 需要启用 "in-process" feature

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, header};
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

use super::{RemoteTier, decode_body};
use crate::{ClientError, ClientResult};

/// Oneshot Remote tier (内存调用)
///
/// 使用 Tower Service 的 oneshot 模式直接调用 Router，
/// 适用于同进程的服务器-客户端通信，零网络开销。
///
/// ```ignore
/// let router = texflow_server::build_app(&state).with_state(state);
/// let remote = OneshotRemote::new(router);
/// let products = remote.call(Method::GET, "/api/products", None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotRemote {
    router: Arc<RwLock<Router>>,
}

impl OneshotRemote {
    /// `router` must already have its state attached
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(RwLock::new(router)),
        }
    }

    /// 替换 Router (服务端重建后)
    pub async fn replace_router(&self, router: Router) {
        *self.router.write().await = router;
    }
}

#[async_trait]
impl RemoteTier for OneshotRemote {
    async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Value> {
        let body = match body {
            Some(value) => Body::from(serde_json::to_vec(value)?),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let router = self.router.read().await.clone();
        let response = router
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Http(format!("Oneshot call failed: {e}")))?;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), &bytes));
        }
        decode_body(&bytes)
    }
}
