//! Backend API client and its payload types.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, PROJECT_CACHE_TTL_SECS};
pub use error::ApiError;
pub use types::{LoginResponse, Project, TimeEntry};
