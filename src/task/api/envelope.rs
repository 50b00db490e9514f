//! JSON response envelope and HTTP status mapping.

use crate::task::{
    domain::{TaskPriority, TaskStatus, TaskTemplate},
    services::{TaskErrorKind, TaskServiceError},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uniform response body: `{success, message?, data?, error?, errors?}`
/// plus query-specific metadata flattened alongside.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use taskdeck::task::api::ApiResponse;
///
/// let response = ApiResponse::success(json!([])).with_meta("count", 0);
/// assert!(response.success);
/// assert_eq!(response.metadata.get("count"), Some(&json!(0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Operation payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Individual validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Counts, paging figures and filter echoes.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ApiResponse {
    /// Creates a successful response carrying `data`.
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
            errors: None,
            metadata: Map::new(),
        }
    }

    /// Creates a failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error.into()),
            errors: None,
            metadata: Map::new(),
        }
    }

    /// Builds the failure body for a service error.
    ///
    /// Validation failures list each message under `errors`. Rejected
    /// enumeration values also echo the accepted alternatives.
    #[must_use]
    pub fn from_error(err: &TaskServiceError) -> Self {
        match err {
            TaskServiceError::Validation(validation) => {
                let mut response = Self::failure("validation failed");
                response.errors = Some(validation.messages());
                if validation.concerns("templateId") {
                    response = response.with_meta("availableTemplates", TaskTemplate::ids());
                }
                if validation.concerns("priority") {
                    response = response.with_meta("validPriorities", TaskPriority::names());
                }
                if validation.concerns("status") {
                    response = response.with_meta("validStatuses", TaskStatus::names());
                }
                response
            }
            TaskServiceError::NotFound(_) => Self::failure("task not found"),
            TaskServiceError::Repository(_) => Self::failure("internal server error"),
        }
    }

    /// Sets the summary message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }
}

/// HTTP status code for a service error: 400, 404 or 500.
#[must_use]
pub const fn status_code(err: &TaskServiceError) -> u16 {
    match err.kind() {
        TaskErrorKind::Validation => 400,
        TaskErrorKind::NotFound => 404,
        TaskErrorKind::Persistence => 500,
    }
}
