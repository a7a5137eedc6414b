use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::LocalTier;
use crate::{ClientError, ClientResult};

/// On-disk cache: `<dir>/<key>.json`
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

fn cache_err(e: std::io::Error) -> ClientError {
    ClientError::Cache(e.to_string())
}

#[async_trait]
impl LocalTier for FileCache {
    async fn load(&self, key: &str) -> ClientResult<Option<Value>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(cache_err(e)),
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // 损坏的缓存按缺失处理，调用方回退到种子数据
                tracing::warn!(path = %path.display(), error = %e, "Discarding unreadable cache file");
                Ok(None)
            }
        }
    }

    async fn store(&self, key: &str, value: &Value) -> ClientResult<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(cache_err)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(value)?;
        tokio::fs::write(&tmp, bytes).await.map_err(cache_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(cache_err)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(cache_err(e)),
        }
    }
}
