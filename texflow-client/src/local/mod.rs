//! Local tier - 本地缓存
//!
//! key → JSON 值。[`MemoryCache`] 随进程结束丢失，[`FileCache`] 每个 key
//! 一个 JSON 文件。

mod file;
mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::ClientResult;

pub use file::FileCache;
pub use memory::MemoryCache;

#[async_trait]
pub trait LocalTier: Send + Sync {
    /// `None` when nothing was stored under `key`
    async fn load(&self, key: &str) -> ClientResult<Option<Value>>;
    async fn store(&self, key: &str, value: &Value) -> ClientResult<()>;
    async fn remove(&self, key: &str) -> ClientResult<()>;
}
