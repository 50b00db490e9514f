//! Service layer for creating and mutating tasks.

use super::{TaskServiceConfig, TaskServiceError, TaskServiceResult};
use crate::task::{
    domain::{
        Task, TaskDraft, TaskId, TaskOverrides, TaskPatch, TaskTemplate, TaskValidationError,
        calendar::start_of_day,
    },
    ports::TaskRepository,
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One draft that bulk creation could not turn into a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    /// Zero-based position of the draft in the request.
    pub index: usize,
    /// Why the draft was rejected.
    pub message: String,
}

/// Counts reported alongside a bulk creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSummary {
    /// Drafts submitted.
    pub total: usize,
    /// Tasks created.
    pub created: usize,
    /// Drafts rejected.
    pub failed: usize,
}

/// Result of a bulk creation: per-draft failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateOutcome {
    /// Tasks created, in request order.
    pub created: Vec<Task>,
    /// Rejected drafts keyed by request index.
    pub failures: Vec<BulkFailure>,
    /// Aggregate counts.
    pub summary: BulkSummary,
}

/// Task creation and mutation orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: TaskServiceConfig,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service with default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_config(repository, clock, TaskServiceConfig::default())
    }

    /// Creates a new task lifecycle service with explicit configuration.
    #[must_use]
    pub const fn with_config(repository: Arc<R>, clock: Arc<C>, config: TaskServiceConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist, or
    /// [`TaskServiceError::Repository`] when the lookup fails.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Validates a draft and persists the resulting task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] listing every invalid field,
    /// or [`TaskServiceError::Repository`] when persistence fails.
    pub async fn create(&self, draft: &TaskDraft) -> TaskServiceResult<Task> {
        let task = Task::create(draft, &*self.clock)?;
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), status = %task.status(), "created task");
        Ok(task)
    }

    /// Creates a task from a title alone, with every other field defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when the title is blank or too
    /// long.
    pub async fn create_quick(&self, title: &str) -> TaskServiceResult<Task> {
        self.create(&TaskDraft::new(title)).await
    }

    /// Creates a pending task from a built-in template, with `overrides`
    /// taking precedence over the preset fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] naming the available
    /// templates when `template_id` is unknown, or when an override is
    /// invalid.
    pub async fn create_from_template(
        &self,
        template_id: &str,
        overrides: TaskOverrides,
    ) -> TaskServiceResult<Task> {
        let template = TaskTemplate::find(template_id)?;
        debug!(template = template.id(), "creating task from template");
        self.create(&overrides.apply_to(template.draft())).await
    }

    /// Creates each draft independently.
    ///
    /// A rejected draft is reported in the outcome and does not stop the
    /// remaining drafts from being created.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when `drafts` is empty or
    /// larger than the configured bulk limit.
    pub async fn create_bulk(&self, drafts: &[TaskDraft]) -> TaskServiceResult<BulkCreateOutcome> {
        if drafts.is_empty() {
            return Err(TaskValidationError::single("tasks", "at least one task is required").into());
        }
        let limit = self.config.bulk_limit();
        if drafts.len() > limit {
            return Err(TaskValidationError::single(
                "tasks",
                format!("too many tasks: at most {limit} can be created at once"),
            )
            .into());
        }

        let mut created = Vec::with_capacity(drafts.len());
        let mut failures = Vec::new();
        for (index, draft) in drafts.iter().enumerate() {
            match self.create(draft).await {
                Ok(task) => created.push(task),
                Err(err) => {
                    warn!(index, error = %err, "bulk task creation rejected a draft");
                    failures.push(BulkFailure {
                        index,
                        message: err.to_string(),
                    });
                }
            }
        }

        let summary = BulkSummary {
            total: drafts.len(),
            created: created.len(),
            failed: failures.len(),
        };
        info!(
            total = summary.total,
            created = summary.created,
            failed = summary.failed,
            "bulk task creation finished"
        );
        Ok(BulkCreateOutcome {
            created,
            failures,
            summary,
        })
    }

    /// Copies an existing task into a new pending task.
    ///
    /// The copy is titled `"<title> (copy)"` unless `overrides` supplies a
    /// title. Progress restarts at zero and notes are not copied.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the source task does not
    /// exist, or [`TaskServiceError::Validation`] when an override is invalid.
    pub async fn duplicate(&self, id: TaskId, overrides: TaskOverrides) -> TaskServiceResult<Task> {
        let source = self.get(id).await?;
        let base = source.duplicate_draft(start_of_day(&self.clock.local()));
        let task = self.create(&overrides.apply_to(base)).await?;
        debug!(source_id = %id, task_id = %task.id(), "duplicated task");
        Ok(task)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist, or
    /// [`TaskServiceError::Validation`] when a touched field is invalid. A
    /// rejected patch leaves the stored task unchanged.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> TaskServiceResult<Task> {
        self.modify(id, |task, clock| task.apply_patch(patch, clock))
            .await
    }

    /// Flips the completion flag.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn toggle_completed(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.modify(id, |task, clock| {
            task.toggle_completed(clock);
            Ok(())
        })
        .await
    }

    /// Sets progress, clamping `value` into `0..=100` instead of rejecting it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn set_progress(&self, id: TaskId, value: i64) -> TaskServiceResult<Task> {
        self.modify(id, |task, clock| {
            task.set_progress(value, clock);
            Ok(())
        })
        .await
    }

    /// Appends a note.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when `content` is blank, or
    /// [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn add_note(&self, id: TaskId, content: &str) -> TaskServiceResult<Task> {
        self.modify(id, |task, clock| task.add_note(content, clock))
            .await
    }

    /// Moves a task straight into the completed state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn mark_complete(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.modify(id, |task, clock| {
            task.mark_complete(clock);
            Ok(())
        })
        .await
    }

    /// Permanently deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        self.repository.delete(id).await?;
        info!(task_id = %id, "deleted task");
        Ok(())
    }

    async fn modify<F>(&self, id: TaskId, mutate: F) -> TaskServiceResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskValidationError> + Send,
    {
        let mut task = self.get(id).await?;
        mutate(&mut task, &*self.clock)?;
        self.repository.update(&task).await?;
        debug!(
            task_id = %id,
            status = %task.status(),
            progress = task.progress(),
            "updated task"
        );
        Ok(task)
    }
}
