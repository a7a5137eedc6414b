//! Remote tier - 服务端通信
//!
//! 两种实现:
//! - [`NetworkRemote`]: reqwest over HTTP
//! - [`OneshotRemote`]: 同进程 tower oneshot (需要 "in-process" feature)

mod network;
#[cfg(feature = "in-process")]
mod oneshot;

use async_trait::async_trait;
use http::Method;
use serde_json::Value;

use crate::ClientResult;

pub use network::NetworkRemote;
#[cfg(feature = "in-process")]
pub use oneshot::OneshotRemote;

/// JSON request/response against the TexFlow API
///
/// A non-success status comes back as [`crate::ClientError::Api`]; an empty
/// success body comes back as `Value::Null`.
#[async_trait]
pub trait RemoteTier: Send + Sync {
    async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Value>;
}

/// Decode a success body
pub(crate) fn decode_body(bytes: &[u8]) -> ClientResult<Value> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|e| crate::ClientError::InvalidResponse(format!("not JSON: {e}")))
}
