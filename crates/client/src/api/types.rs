//! Request and response payloads exchanged with the backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login payload. Fields besides `token` are passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A project as returned by the backend.
///
/// The record is opaque to the client and kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Project(Value);

impl Project {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The `id` field, when it is a string or a number.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub project_id: String,
    pub hours: f64,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_entry_uses_backend_field_names() {
        let entry = TimeEntry {
            project_id: "p-1".to_string(),
            hours: 2.5,
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        };

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"projectId": "p-1", "hours": 2.5, "date": "2025-01-15"})
        );
    }

    #[test]
    fn login_response_keeps_extra_fields() {
        let login: LoginResponse =
            serde_json::from_value(json!({"token": "abc", "user": {"id": 3}})).unwrap();

        assert_eq!(login.token, "abc");
        assert_eq!(login.extra.get("user"), Some(&json!({"id": 3})));
    }

    #[test]
    fn project_accessors_read_conventional_fields() {
        let project = Project::new(json!({"id": 12, "name": "Website"}));
        assert_eq!(project.id(), Some("12".to_string()));
        assert_eq!(project.name(), Some("Website"));

        let bare = Project::new(json!({"title": "x"}));
        assert_eq!(bare.id(), None);
        assert_eq!(bare.name(), None);
    }
}
