//! Built-in task templates.

use super::{TaskDraft, TaskPriority, TaskValidationError};

/// A named preset for quick task creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    id: &'static str,
    title: &'static str,
    priority: TaskPriority,
    category: &'static str,
    tags: &'static [&'static str],
}

/// The fixed template table.
pub const TASK_TEMPLATES: [TaskTemplate; 4] = [
    TaskTemplate {
        id: "work",
        title: "Work task",
        priority: TaskPriority::Medium,
        category: "work",
        tags: &["work"],
    },
    TaskTemplate {
        id: "personal",
        title: "Personal errand",
        priority: TaskPriority::Low,
        category: "personal",
        tags: &["personal"],
    },
    TaskTemplate {
        id: "urgent",
        title: "Urgent task",
        priority: TaskPriority::Urgent,
        category: "urgent",
        tags: &["urgent"],
    },
    TaskTemplate {
        id: "study",
        title: "Study session",
        priority: TaskPriority::Medium,
        category: "study",
        tags: &["study"],
    },
];

impl TaskTemplate {
    /// Looks up a template by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] naming the available templates when
    /// `id` is unknown.
    pub fn find(id: &str) -> Result<Self, TaskValidationError> {
        TASK_TEMPLATES
            .iter()
            .find(|template| template.id == id)
            .copied()
            .ok_or_else(|| {
                TaskValidationError::single(
                    "templateId",
                    format!(
                        "unknown template '{id}', available templates: {}",
                        Self::ids().join(", ")
                    ),
                )
            })
    }

    /// Returns every template identifier.
    #[must_use]
    pub fn ids() -> Vec<&'static str> {
        TASK_TEMPLATES.iter().map(|template| template.id).collect()
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Returns the preset priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the preset category.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        self.category
    }

    /// Builds the base draft for this template.
    #[must_use]
    pub fn draft(&self) -> TaskDraft {
        TaskDraft::new(self.title)
            .with_priority(self.priority.as_str())
            .with_category(self.category)
            .with_tags(self.tags.iter().copied())
    }
}
