//! Transport-facing rendering for the task context.
//!
//! Routing lives outside this crate. These helpers turn service results into
//! the `{success, message?, data?, error?, errors?}` envelope and map service
//! errors onto HTTP status codes.

mod envelope;
mod view;

pub use envelope::{ApiResponse, status_code};
pub use view::{
    TaskView, bulk_response, day_response, due_soon_response, page_response, statistics_response,
    task_response, task_values, tasks_response, week_response,
};
