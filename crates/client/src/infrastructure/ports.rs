//! Port traits for infrastructure boundaries.
//!
//! The API client depends only on these traits. Ports exist for:
//! - HTTP transport (reqwest in production, mocks in tests)
//! - Persistent key-value storage (file-backed, in-memory)
//! - Clock (for testing cache expiry)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage write failed: {0}")]
    Io(String),
    #[error("Storage serialization failed: {0}")]
    Serialization(String),
}

// =============================================================================
// HTTP Port
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single request against the backend, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Sent as `Authorization: Bearer {token}` when present
    pub bearer_token: Option<String>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            bearer_token: None,
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            bearer_token: None,
            body: Some(body),
        }
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }
}

/// Raw response: status code and undecoded body text.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Object-safe HTTP boundary implemented by transport adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpPort: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =============================================================================
// Storage Port
// =============================================================================

/// Persistent storage abstraction (file-based, in-memory)
///
/// Writes report failure so a value that never became durable is not
/// mistaken for a stored one.
#[cfg_attr(test, mockall::automock)]
pub trait StoragePort: Send + Sync {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage key constants
pub mod storage_keys {
    pub const TOKEN: &str = "token";
}

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
