//! Caller-facing error taxonomy for task services.

use crate::task::{
    domain::{FieldViolation, TaskId, TaskValidationError},
    ports::TaskRepositoryError,
};
use thiserror::Error;

/// Service-level errors for task operations.
#[derive(Debug, Clone, Error)]
pub enum TaskServiceError {
    /// Input was rejected; the caller can fix it.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

/// Coarse classification of a [`TaskServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// Bad or missing input.
    Validation,
    /// Missing record.
    NotFound,
    /// Storage failure.
    Persistence,
}

impl TaskServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::Validation(_) => TaskErrorKind::Validation,
            Self::NotFound(_) => TaskErrorKind::NotFound,
            Self::Repository(_) => TaskErrorKind::Persistence,
        }
    }
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<FieldViolation> for TaskServiceError {
    fn from(violation: FieldViolation) -> Self {
        Self::Validation(violation.into())
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;
