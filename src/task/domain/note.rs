//! Free-form notes appended to a task.

use super::FieldViolation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskNote {
    content: String,
    created_at: DateTime<Utc>,
}

impl TaskNote {
    /// Creates a note from caller content.
    ///
    /// # Errors
    ///
    /// Returns a violation on `content` when the text is blank.
    pub fn new(content: &str, created_at: DateTime<Utc>) -> Result<Self, FieldViolation> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(FieldViolation::new("content", "note content must not be empty"));
        }
        Ok(Self {
            content: trimmed.to_owned(),
            created_at,
        })
    }

    /// Returns the note text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the note was written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
