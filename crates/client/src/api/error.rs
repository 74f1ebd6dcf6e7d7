//! Normalized client error.
//!
//! Every failed backend call, whatever its cause, surfaces as one `ApiError`
//! whose message is `"{context}: {detail}"`. `detail` is the backend's own
//! `error` text when the response carries one, otherwise the transport's
//! message.

use serde_json::Value;

use crate::infrastructure::ports::{HttpResponse, TransportError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{context}: {detail}")]
pub struct ApiError {
    context: String,
    detail: String,
    status: Option<u16>,
}

impl ApiError {
    pub fn new(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            detail: detail.into(),
            status: None,
        }
    }

    /// Error for a non-success response.
    pub fn from_response(context: &str, response: &HttpResponse) -> Self {
        let detail = backend_error_text(&response.body).unwrap_or_else(|| {
            format!("Request failed with status code {}", response.status)
        });
        Self {
            context: context.to_string(),
            detail,
            status: Some(response.status),
        }
    }

    pub fn from_transport(context: &str, error: TransportError) -> Self {
        Self::new(context, error.to_string())
    }

    /// Error for a success response whose body does not have the expected shape.
    pub fn malformed(context: &str, status: u16, error: serde_json::Error) -> Self {
        Self {
            context: context.to_string(),
            detail: format!("Malformed response: {error}"),
            status: Some(status),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

/// Extract the backend's `error` field from a JSON body.
fn backend_error_text(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
