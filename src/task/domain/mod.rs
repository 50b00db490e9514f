//! Domain model for task management.
//!
//! The task domain owns field validation, the coupled completion state and
//! the query vocabulary, while keeping all infrastructure concerns outside
//! of the domain boundary.

pub mod calendar;
mod draft;
mod error;
mod ids;
mod note;
mod priority;
mod query;
mod repeat;
mod statistics;
mod status;
mod task;
mod template;
pub mod validation;

pub use draft::{RepeatDraft, TaskDraft, TaskOverrides, TaskPatch};
pub use error::{
    FieldViolation, ParsePriorityError, ParseRepeatKindError, ParseStatusError,
    TaskValidationError,
};
pub use ids::TaskId;
pub use note::TaskNote;
pub use priority::TaskPriority;
pub use query::{
    DueWindow, ResultWindow, SearchScope, SortDirection, SortField, TaskFilter, TaskPage,
    TaskSort, TextSearch,
};
pub use repeat::{RepeatKind, RepeatRule};
pub use statistics::{TaskStatistics, TaskTally};
pub use status::TaskStatus;
pub use task::{DUE_SOON_DAYS, PersistedTaskData, Task};
pub use template::{TASK_TEMPLATES, TaskTemplate};
