//! Caller input for creating and patching tasks.
//!
//! Drafts and patches carry raw, unvalidated values (enum names as strings,
//! progress as a signed integer) so that bad input surfaces as a
//! [`TaskValidationError`] naming the field, rather than as a type error at
//! the edge.

use super::{
    RepeatRule, TaskPriority, TaskStatus, TaskValidationError, error::Violations, validation,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Raw recurrence input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepeatDraft {
    /// Repeat kind name; defaults to `none`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Repeat interval; defaults to 1.
    pub interval: Option<i64>,
    /// Optional end of the recurrence.
    pub end_date: Option<DateTime<Utc>>,
}

impl RepeatDraft {
    /// Creates a draft for the given kind with the default interval.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Sets the interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: i64) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Sets the end date.
    #[must_use]
    pub const fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    fn validate(&self) -> Result<RepeatRule, super::FieldViolation> {
        validation::repeat(self.kind.as_deref(), self.interval, self.end_date)
    }
}

impl From<&RepeatRule> for RepeatDraft {
    fn from(rule: &RepeatRule) -> Self {
        Self {
            kind: Some(rule.kind().as_str().to_owned()),
            interval: Some(i64::from(rule.interval())),
            end_date: rule.end_date(),
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    title: String,
    description: Option<String>,
    priority: Option<String>,
    category: Option<String>,
    due_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
    status: Option<String>,
    progress: Option<i64>,
    repeat: Option<RepeatDraft>,
    notes: Vec<String>,
}

impl TaskDraft {
    /// Creates a draft with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority name.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the status name.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the progress percentage.
    #[must_use]
    pub const fn with_progress(mut self, progress: i64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sets the recurrence rule.
    #[must_use]
    pub fn with_repeat(mut self, repeat: RepeatDraft) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Sets initial notes. Blank notes are dropped on creation.
    #[must_use]
    pub fn with_notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notes = notes.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the raw title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Validates every field, reporting all violations together.
    pub(crate) fn validate(
        &self,
        start_of_today: DateTime<Utc>,
    ) -> Result<NewTaskFields, TaskValidationError> {
        let mut violations = Violations::default();
        let title = violations
            .check(validation::title(&self.title))
            .unwrap_or_default();
        let description = violations
            .check(validation::description(
                self.description.as_deref().unwrap_or_default(),
            ))
            .unwrap_or_default();
        let category = violations
            .check(validation::category(
                self.category.as_deref().unwrap_or_default(),
            ))
            .unwrap_or_default();
        let tags = violations
            .check(validation::tags(&self.tags))
            .unwrap_or_default();
        let priority = self
            .priority
            .as_deref()
            .and_then(|raw| violations.check(validation::priority(raw)))
            .unwrap_or_default();
        let status = self
            .status
            .as_deref()
            .and_then(|raw| violations.check(validation::status(raw)));
        let progress = self
            .progress
            .and_then(|raw| violations.check(validation::progress(raw)));
        let repeat = self
            .repeat
            .as_ref()
            .and_then(|draft| violations.check(draft.validate()))
            .unwrap_or_default();
        let due_date = self
            .due_date
            .and_then(|raw| violations.check(validation::due_date(raw, start_of_today)));
        violations.into_result()?;

        Ok(NewTaskFields {
            title,
            description,
            priority,
            category,
            due_date,
            tags,
            status,
            progress,
            repeat,
            notes: self
                .notes
                .iter()
                .map(|note| note.trim())
                .filter(|note| !note.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        })
    }
}

/// Validated creation input.
///
/// `status` and `progress` stay optional so the consistency rules know
/// which of them the caller actually supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewTaskFields {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) priority: TaskPriority,
    pub(crate) category: String,
    pub(crate) due_date: Option<DateTime<Utc>>,
    pub(crate) tags: Vec<String>,
    pub(crate) status: Option<TaskStatus>,
    pub(crate) progress: Option<u8>,
    pub(crate) repeat: RepeatRule,
    pub(crate) notes: Vec<String>,
}

/// Partial update input. Unset fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
    priority: Option<String>,
    category: Option<String>,
    #[serde(deserialize_with = "deserialize_present")]
    due_date: Option<Option<DateTime<Utc>>>,
    tags: Option<Vec<String>>,
    status: Option<String>,
    progress: Option<i64>,
    repeat: Option<RepeatDraft>,
}

/// Distinguishes an explicit JSON `null` (clear) from an absent field.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Replaces the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Replaces the progress.
    #[must_use]
    pub const fn with_progress(mut self, progress: i64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Replaces the recurrence rule.
    #[must_use]
    pub fn with_repeat(mut self, repeat: RepeatDraft) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Validates the touched fields only.
    pub(crate) fn validate(
        &self,
        start_of_today: DateTime<Utc>,
    ) -> Result<ValidPatch, TaskValidationError> {
        let mut violations = Violations::default();
        let title = self
            .title
            .as_deref()
            .and_then(|raw| violations.check(validation::title(raw)));
        let description = self
            .description
            .as_deref()
            .and_then(|raw| violations.check(validation::description(raw)));
        let category = self
            .category
            .as_deref()
            .and_then(|raw| violations.check(validation::category(raw)));
        let tags = self
            .tags
            .as_deref()
            .and_then(|raw| violations.check(validation::tags(raw)));
        let priority = self
            .priority
            .as_deref()
            .and_then(|raw| violations.check(validation::priority(raw)));
        let status = self
            .status
            .as_deref()
            .and_then(|raw| violations.check(validation::status(raw)));
        let progress = self
            .progress
            .and_then(|raw| violations.check(validation::progress(raw)));
        let repeat = self
            .repeat
            .as_ref()
            .and_then(|draft| violations.check(draft.validate()));
        let due_date = match self.due_date {
            Some(Some(raw)) => violations
                .check(validation::due_date(raw, start_of_today))
                .map(Some),
            Some(None) => Some(None),
            None => None,
        };
        violations.into_result()?;

        Ok(ValidPatch {
            title,
            description,
            completed: self.completed,
            priority,
            category,
            due_date,
            tags,
            status,
            progress,
            repeat,
        })
    }
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ValidPatch {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) completed: Option<bool>,
    pub(crate) priority: Option<TaskPriority>,
    pub(crate) category: Option<String>,
    pub(crate) due_date: Option<Option<DateTime<Utc>>>,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) status: Option<TaskStatus>,
    pub(crate) progress: Option<u8>,
    pub(crate) repeat: Option<RepeatRule>,
}

/// Field overrides layered over a template or an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskOverrides {
    /// Replacement title. Blank titles are ignored.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement priority name.
    pub priority: Option<String>,
    /// Replacement category.
    pub category: Option<String>,
    /// Replacement due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
    /// Replacement recurrence rule.
    pub repeat: Option<RepeatDraft>,
}

impl TaskOverrides {
    /// Creates an empty set of overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Overrides the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Overrides the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Overrides the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Layers these overrides over `base`, producing a fresh pending draft
    /// with zero progress and no notes.
    #[must_use]
    pub fn apply_to(self, base: TaskDraft) -> TaskDraft {
        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(base.title);
        TaskDraft {
            title,
            description: self.description.or(base.description),
            priority: self.priority.or(base.priority),
            category: self.category.or(base.category),
            due_date: self.due_date.or(base.due_date),
            tags: self.tags.unwrap_or(base.tags),
            status: Some(TaskStatus::Pending.as_str().to_owned()),
            progress: Some(0),
            repeat: self.repeat.or(base.repeat),
            notes: Vec::new(),
        }
    }
}
