//! Task aggregate root.

use super::{
    RepeatRule, TaskDraft, TaskId, TaskNote, TaskPatch, TaskPriority, TaskStatus,
    TaskValidationError,
    calendar::start_of_day,
    draft::{NewTaskFields, ValidPatch},
    validation::{self, PROGRESS_MAX},
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Days ahead of the due date during which a task counts as due soon.
pub const DUE_SOON_DAYS: i64 = 3;

/// Task aggregate root.
///
/// `progress`, `status`, `completed` and `completed_at` form one coupled
/// state: after any mutation, progress is 100 exactly when the status is
/// completed, exactly when `completed` is set, and `completed_at` is present
/// exactly when the task is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    completed: bool,
    priority: TaskPriority,
    category: String,
    due_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
    status: TaskStatus,
    progress: u8,
    repeat: RepeatRule,
    notes: Vec<TaskNote>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted category.
    pub category: String,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted tags.
    pub tags: Vec<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted progress.
    pub progress: u8,
    /// Persisted recurrence rule.
    pub repeat: RepeatRule,
    /// Persisted notes.
    pub notes: Vec<TaskNote>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Which of the coupled fields a mutation set explicitly.
#[derive(Debug, Clone, Copy, Default)]
struct Touched {
    progress: bool,
    completed: bool,
    status: bool,
}

impl Task {
    /// Validates a draft and builds a new task from it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] listing every invalid field.
    pub fn create(draft: &TaskDraft, clock: &impl Clock) -> Result<Self, TaskValidationError> {
        let fields = draft.validate(start_of_day(&clock.local()))?;
        Ok(Self::from_fields(fields, clock.utc()))
    }

    fn from_fields(fields: NewTaskFields, now: DateTime<Utc>) -> Self {
        let NewTaskFields {
            title,
            description,
            priority,
            category,
            due_date,
            tags,
            status,
            progress,
            repeat,
            notes,
        } = fields;
        let touched = Touched {
            progress: progress.is_some(),
            completed: false,
            status: status.is_some(),
        };
        let notes = notes
            .iter()
            .filter_map(|content| TaskNote::new(content, now).ok())
            .collect();

        let mut task = Self {
            id: TaskId::new(),
            title,
            description,
            completed: false,
            priority,
            category,
            due_date,
            tags,
            status: status.unwrap_or_default(),
            progress: progress.unwrap_or_default(),
            repeat,
            notes,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        task.reconcile(touched, false, now);
        task
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            completed: data.completed,
            priority: data.priority,
            category: data.category,
            due_date: data.due_date,
            tags: data.tags,
            status: data.status,
            progress: data.progress,
            repeat: data.repeat,
            notes: data.notes,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the tags in their stored order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the progress percentage.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Returns the recurrence rule.
    #[must_use]
    pub const fn repeat(&self) -> &RepeatRule {
        &self.repeat
    }

    /// Returns the notes in insertion order.
    #[must_use]
    pub fn notes(&self) -> &[TaskNote] {
        &self.notes
    }

    /// Returns when the task was completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the due date has passed and the task is open.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Whole days until the due date, rounded up. Negative once overdue.
    #[must_use]
    pub fn days_until_due(&self, now: DateTime<Utc>) -> Option<i64> {
        self.due_date.map(|due| {
            let remaining = due - now;
            let whole = remaining.num_days();
            let has_partial_day =
                TimeDelta::try_days(whole).is_some_and(|truncated| remaining > truncated);
            if has_partial_day { whole + 1 } else { whole }
        })
    }

    /// Returns `true` when the task is due within the next few days.
    #[must_use]
    pub fn is_due_soon(&self, now: DateTime<Utc>) -> bool {
        self.days_until_due(now)
            .is_some_and(|days| (0..=DUE_SOON_DAYS).contains(&days))
    }

    /// Completion percentage: 100 when completed, otherwise the progress.
    #[must_use]
    pub const fn completion_rate(&self) -> u8 {
        if self.completed {
            PROGRESS_MAX
        } else {
            self.progress
        }
    }

    /// Applies a partial update.
    ///
    /// The patch is validated in full before any field changes, so a
    /// rejected patch leaves the task untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] when any touched field is invalid.
    pub fn apply_patch(
        &mut self,
        patch: &TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskValidationError> {
        let valid = patch.validate(start_of_day(&clock.local()))?;
        self.apply_valid_patch(valid, clock.utc());
        Ok(())
    }

    fn apply_valid_patch(&mut self, patch: ValidPatch, now: DateTime<Utc>) {
        let was_completed = self.completed;
        let touched = Touched {
            progress: patch.progress.is_some(),
            completed: patch.completed.is_some(),
            status: patch.status.is_some(),
        };
        let ValidPatch {
            title,
            description,
            completed,
            priority,
            category,
            due_date,
            tags,
            status,
            progress,
            repeat,
        } = patch;

        replace_if_set(&mut self.title, title);
        replace_if_set(&mut self.description, description);
        replace_if_set(&mut self.completed, completed);
        replace_if_set(&mut self.priority, priority);
        replace_if_set(&mut self.category, category);
        replace_if_set(&mut self.due_date, due_date);
        replace_if_set(&mut self.tags, tags);
        replace_if_set(&mut self.status, status);
        replace_if_set(&mut self.progress, progress);
        replace_if_set(&mut self.repeat, repeat);

        self.reconcile(touched, was_completed, now);
    }

    /// Flips the completion flag and reconciles the coupled state.
    pub fn toggle_completed(&mut self, clock: &impl Clock) {
        let was_completed = self.completed;
        self.completed = !self.completed;
        let touched = Touched {
            completed: true,
            ..Touched::default()
        };
        self.reconcile(touched, was_completed, clock.utc());
    }

    /// Sets progress, clamping out-of-range input into `0..=100`.
    pub fn set_progress(&mut self, value: i64, clock: &impl Clock) {
        let was_completed = self.completed;
        self.progress = validation::clamp_progress(value);
        let touched = Touched {
            progress: true,
            ..Touched::default()
        };
        self.reconcile(touched, was_completed, clock.utc());
    }

    /// Appends a note.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] when `content` is blank.
    pub fn add_note(&mut self, content: &str, clock: &impl Clock) -> Result<(), TaskValidationError> {
        let now = clock.utc();
        let note = TaskNote::new(content, now).map_err(TaskValidationError::from)?;
        self.notes.push(note);
        self.updated_at = now;
        Ok(())
    }

    /// Moves the task straight into its terminal completed state.
    pub fn mark_complete(&mut self, clock: &impl Clock) {
        let now = clock.utc();
        self.enter_completed();
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    /// Builds the draft used to duplicate this task.
    ///
    /// The copy is titled `"<title> (copy)"`. The due date is carried over
    /// only while it would still pass creation-time validation.
    #[must_use]
    pub fn duplicate_draft(&self, start_of_today: DateTime<Utc>) -> TaskDraft {
        let mut draft = TaskDraft::new(format!("{} (copy)", self.title))
            .with_description(self.description.clone())
            .with_priority(self.priority.as_str())
            .with_category(self.category.clone())
            .with_tags(self.tags.iter().cloned())
            .with_repeat((&self.repeat).into());
        if let Some(due) = self
            .due_date
            .and_then(|due| validation::due_date(due, start_of_today).ok())
        {
            draft = draft.with_due_date(due);
        }
        draft
    }

    /// Restores the coupled-state invariants after a mutation.
    ///
    /// An explicit progress change wins over an explicit completion flag,
    /// which wins over an explicit status.
    fn reconcile(&mut self, touched: Touched, was_completed: bool, now: DateTime<Utc>) {
        if touched.progress {
            self.reconcile_progress();
        } else if touched.completed {
            if self.completed {
                self.enter_completed();
            } else {
                self.clear_completion();
            }
        } else if touched.status {
            if self.status == TaskStatus::Completed {
                self.enter_completed();
            } else {
                self.clear_completion();
            }
        }

        if !self.completed {
            self.completed_at = None;
        } else if !was_completed || self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.updated_at = now;
    }

    fn reconcile_progress(&mut self) {
        if self.progress == PROGRESS_MAX {
            self.enter_completed();
        } else if self.completed || self.status == TaskStatus::Completed {
            self.completed = false;
            self.status = if self.progress > 0 {
                TaskStatus::InProgress
            } else {
                TaskStatus::Pending
            };
        } else if self.progress > 0 && self.status == TaskStatus::Pending {
            self.status = TaskStatus::InProgress;
        } else if self.progress == 0 && self.status == TaskStatus::InProgress {
            self.status = TaskStatus::Pending;
        }
    }

    const fn enter_completed(&mut self) {
        self.completed = true;
        self.status = TaskStatus::Completed;
        self.progress = PROGRESS_MAX;
    }

    const fn clear_completion(&mut self) {
        self.completed = false;
        if matches!(self.status, TaskStatus::Completed) {
            self.status = TaskStatus::Pending;
        }
        if self.progress == PROGRESS_MAX {
            self.progress = 0;
        }
    }
}

fn replace_if_set<T>(field: &mut T, value: Option<T>) {
    if let Some(new_value) = value {
        *field = new_value;
    }
}

