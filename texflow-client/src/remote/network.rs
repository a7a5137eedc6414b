// texflow-client/src/remote/network.rs
// 网络 HTTP 客户端

use std::time::Duration;

use async_trait::async_trait;
use http::Method;
use reqwest::Client;
use serde_json::Value;

use super::{RemoteTier, decode_body};
use crate::{ClientError, ClientResult};

/// 网络 Remote tier
#[derive(Debug, Clone)]
pub struct NetworkRemote {
    client: Client,
    base_url: String,
}

impl NetworkRemote {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RemoteTier for NetworkRemote {
    async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), &bytes));
        }
        decode_body(&bytes)
    }
}
