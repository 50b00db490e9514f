//! Application services for task lifecycle orchestration and queries.

mod config;
mod error;
mod lifecycle;
mod query;

pub use config::TaskServiceConfig;
pub use error::{TaskErrorKind, TaskServiceError, TaskServiceResult};
pub use lifecycle::{BulkCreateOutcome, BulkFailure, BulkSummary, TaskLifecycleService};
pub use query::{
    CalendarFilter, DayTasks, DueSoonTasks, FindOptions, ListTasksRequest, TaskQueryService,
    WeekTasks,
};
