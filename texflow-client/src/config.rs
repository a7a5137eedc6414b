//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default server base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Every remote call is abandoned after this long
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Client configuration for connecting to a TexFlow server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Directory for the on-disk cache; `None` keeps the cache in memory
    pub cache_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            cache_dir: None,
        }
    }

    /// Read `TEXFLOW_URL`, `TEXFLOW_TIMEOUT_MS` and `TEXFLOW_CACHE_DIR`
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("TEXFLOW_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        );
        if let Some(ms) = std::env::var("TEXFLOW_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_millis(ms);
        }
        if let Ok(dir) = std::env::var("TEXFLOW_CACHE_DIR") {
            config.cache_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Persist the cache and pending writes under `dir`
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_three_seconds() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.cache_dir.is_none());

        let config = ClientConfig::new("http://shop:5000")
            .with_timeout(Duration::from_millis(250))
            .with_cache_dir("/tmp/texflow");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/texflow")));
    }
}
