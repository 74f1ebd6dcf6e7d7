//! Client configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::infrastructure::storage::default_storage_path;

/// Client configuration loaded from environment
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://tracker.example.com/api`
    pub backend_url: String,
    /// File holding the persisted session token
    pub storage_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let backend_url = env::var("TIMETRACK_BACKEND_URL")
            .or_else(|_| env::var("BACKEND_URL"))
            .context("TIMETRACK_BACKEND_URL environment variable is required")?;

        Self::from_values(
            &backend_url,
            env::var("TIMETRACK_STORAGE_PATH").ok().map(PathBuf::from),
        )
    }

    fn from_values(backend_url: &str, storage_path: Option<PathBuf>) -> Result<Self> {
        let backend_url = backend_url.trim().trim_end_matches('/').to_string();
        if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
            anyhow::bail!("Backend URL must start with http:// or https://, got {backend_url:?}");
        }

        Ok(Self {
            backend_url,
            storage_path: storage_path.unwrap_or_else(default_storage_path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backend_url() {
        let config = ClientConfig::from_values(" http://localhost:8080/ ", None).unwrap();
        assert_eq!(config.backend_url, "http://localhost:8080");
        assert_eq!(config.storage_path, default_storage_path());
    }

    #[test]
    fn keeps_explicit_storage_path() {
        let config =
            ClientConfig::from_values("https://api.example.com", Some("/tmp/t.json".into()))
                .unwrap();
        assert_eq!(config.storage_path, PathBuf::from("/tmp/t.json"));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = ClientConfig::from_values("localhost:8080", None).unwrap_err();
        assert!(err.to_string().contains("http://"));
    }
}
