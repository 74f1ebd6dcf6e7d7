//! Timetrack client library.
//!
//! Talks to the time-tracking backend on behalf of a front-end.
//!
//! ## Structure
//!
//! - `api/` - The authenticated `ApiClient`, its payloads and the normalized `ApiError`
//! - `infrastructure/` - Ports (HTTP, storage, clock) and their adapters
//! - `config` - Environment-based configuration

pub mod api;
pub mod config;
pub mod infrastructure;

pub use api::{ApiClient, ApiError, Project};
pub use config::ClientConfig;
