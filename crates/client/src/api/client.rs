//! Authenticated backend client.
//!
//! Mediates every call to the time-tracking backend, keeps the session token
//! in the injected storage, and serves the project list from a short-lived
//! cache.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::{Credentials, LoginResponse, Project, ProjectsResponse, TimeEntry};
use crate::infrastructure::cache::ExpiringSlot;
use crate::infrastructure::ports::{
    storage_keys, ClockPort, HttpPort, HttpRequest, StoragePort,
};

/// How long a fetched project list is served without asking the backend again.
pub const PROJECT_CACHE_TTL_SECS: i64 = 5 * 60;

const AUTHENTICATE_FAILED: &str = "Error authenticating user";
const REGISTER_FAILED: &str = "Error registering user";
const FETCH_PROJECTS_FAILED: &str = "Error fetching projects";
const SUBMIT_TIME_ENTRY_FAILED: &str = "Error submitting time entry";
const LOGOUT_FAILED: &str = "Error logging out";

pub struct ApiClient {
    http: Arc<dyn HttpPort>,
    storage: Arc<dyn StoragePort>,
    clock: Arc<dyn ClockPort>,
    projects: ExpiringSlot<Vec<Project>>,
}

impl ApiClient {
    pub fn new(
        http: Arc<dyn HttpPort>,
        storage: Arc<dyn StoragePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            http,
            storage,
            clock,
            projects: ExpiringSlot::new(Duration::seconds(PROJECT_CACHE_TTL_SECS)),
        }
    }

    /// Log in and keep the returned session token.
    ///
    /// A new session may belong to a different user, so the project cache is
    /// dropped on success.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let body = request_body(AUTHENTICATE_FAILED, &Credentials { email, password })?;
        let login: LoginResponse = self
            .call(AUTHENTICATE_FAILED, HttpRequest::post("/auth/login", body))
            .await?;

        self.storage
            .save(storage_keys::TOKEN, &login.token)
            .map_err(|e| {
                let err = ApiError::new(AUTHENTICATE_FAILED, e.to_string());
                tracing::error!("{}", err);
                err
            })?;
        self.projects.clear().await;
        tracing::debug!("Session token stored, project cache invalidated");

        Ok(login)
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let body = request_body(REGISTER_FAILED, &Credentials { email, password })?;
        self.call(REGISTER_FAILED, HttpRequest::post("/auth/register", body))
            .await
    }

    /// List projects, from cache while it is fresh.
    ///
    /// A response that arrives after a login or logout is returned to its
    /// caller but not cached, since it belongs to the previous session.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        if let Some(projects) = self.projects.get(self.clock.now()).await {
            tracing::debug!(count = projects.len(), "Serving projects from cache");
            return Ok(projects);
        }

        let generation = self.projects.generation().await;
        let request = HttpRequest::get("/projects").with_bearer(self.session_token());
        let response: ProjectsResponse = self.call(FETCH_PROJECTS_FAILED, request).await?;

        let cached = self
            .projects
            .insert_if_current(response.projects.clone(), self.clock.now(), generation)
            .await;
        if cached {
            tracing::debug!(count = response.projects.len(), "Project cache refreshed");
        } else {
            tracing::debug!("Session changed during fetch, project list not cached");
        }

        Ok(response.projects)
    }

    /// Record hours worked on a project. Returns the backend's acknowledgement.
    pub async fn submit_time_entry(
        &self,
        project_id: &str,
        hours: f64,
        date: NaiveDate,
    ) -> Result<Value, ApiError> {
        if !hours.is_finite() {
            let err = ApiError::new(SUBMIT_TIME_ENTRY_FAILED, "hours must be a finite number");
            tracing::error!("{}", err);
            return Err(err);
        }

        let entry = TimeEntry {
            project_id: project_id.to_string(),
            hours,
            date,
        };
        let body = request_body(SUBMIT_TIME_ENTRY_FAILED, &entry)?;
        let request = HttpRequest::post("/time-entries", body).with_bearer(self.session_token());

        self.call(SUBMIT_TIME_ENTRY_FAILED, request).await
    }

    /// Forget the session. Safe to call when already logged out.
    ///
    /// The project cache is dropped even when the token cannot be removed.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.projects.clear().await;
        self.storage.remove(storage_keys::TOKEN).map_err(|e| {
            let err = ApiError::new(LOGOUT_FAILED, e.to_string());
            tracing::error!("{}", err);
            err
        })?;
        tracing::debug!("Session token removed, project cache invalidated");
        Ok(())
    }

    pub fn session_token(&self) -> Option<String> {
        self.storage.load(storage_keys::TOKEN)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_token().is_some()
    }

    /// Send a request and decode the JSON body, normalizing every failure.
    async fn call<T: DeserializeOwned>(
        &self,
        context: &str,
        request: HttpRequest,
    ) -> Result<T, ApiError> {
        let result = self.execute(context, request).await;
        if let Err(e) = &result {
            tracing::error!(status = ?e.status(), "{}", e);
        }
        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        context: &str,
        request: HttpRequest,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| ApiError::from_transport(context, e))?;

        if !response.is_success() {
            return Err(ApiError::from_response(context, &response));
        }

        // Empty acknowledgements decode as JSON null
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::malformed(context, response.status, e))
    }
}

fn request_body<B: Serialize>(context: &str, body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::new(context, format!("Invalid request body: {e}")))
}
