//! Read-model rendering of tasks and query results.

use super::ApiResponse;
use crate::task::{
    domain::{Task, TaskPage, TaskStatistics},
    services::{BulkCreateOutcome, DayTasks, DueSoonTasks, WeekTasks},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// A task together with the attributes computed at read time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView<'a> {
    #[serde(flatten)]
    task: &'a Task,
    is_overdue: bool,
    days_until_due: Option<i64>,
    is_due_soon: bool,
    completion_rate: u8,
}

impl<'a> TaskView<'a> {
    /// Renders `task` as seen at `now`.
    #[must_use]
    pub fn new(task: &'a Task, now: DateTime<Utc>) -> Self {
        Self {
            task,
            is_overdue: task.is_overdue(now),
            days_until_due: task.days_until_due(now),
            is_due_soon: task.is_due_soon(now),
            completion_rate: task.completion_rate(),
        }
    }
}

/// Serializes tasks with their computed attributes.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn task_values(tasks: &[Task], now: DateTime<Utc>) -> serde_json::Result<Value> {
    let views: Vec<TaskView<'_>> = tasks.iter().map(|task| TaskView::new(task, now)).collect();
    serde_json::to_value(views)
}

/// Envelope for a single task.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn task_response(task: &Task, now: DateTime<Utc>) -> serde_json::Result<ApiResponse> {
    Ok(ApiResponse::success(serde_json::to_value(TaskView::new(task, now))?))
}

/// Envelope for a task list with its `count`.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn tasks_response(tasks: &[Task], now: DateTime<Utc>) -> serde_json::Result<ApiResponse> {
    Ok(ApiResponse::success(task_values(tasks, now)?).with_meta("count", tasks.len()))
}

/// Envelope for one page of a list query.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn page_response(page: &TaskPage, now: DateTime<Utc>) -> serde_json::Result<ApiResponse> {
    Ok(ApiResponse::success(task_values(&page.tasks, now)?)
        .with_meta("count", page.tasks.len())
        .with_meta("totalCount", page.total_count)
        .with_meta("page", page.page)
        .with_meta("totalPages", page.total_pages))
}

/// Envelope for tasks due today, echoing the date.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn day_response(day: &DayTasks, now: DateTime<Utc>) -> serde_json::Result<ApiResponse> {
    Ok(tasks_response(&day.tasks, now)?.with_meta("date", day.date.to_string()))
}

/// Envelope for tasks due this week, echoing its bounds.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn week_response(week: &WeekTasks, now: DateTime<Utc>) -> serde_json::Result<ApiResponse> {
    Ok(tasks_response(&week.tasks, now)?
        .with_meta("weekStart", week.week_start.to_string())
        .with_meta("weekEnd", week.week_end.to_string()))
}

/// Envelope for tasks due soon, echoing the window.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn due_soon_response(
    due_soon: &DueSoonTasks,
    now: DateTime<Utc>,
) -> serde_json::Result<ApiResponse> {
    Ok(tasks_response(&due_soon.tasks, now)?.with_meta("days", due_soon.days))
}

/// Envelope for a bulk creation: created tasks, per-index errors and the
/// summary.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn bulk_response(
    outcome: &BulkCreateOutcome,
    now: DateTime<Utc>,
) -> serde_json::Result<ApiResponse> {
    let data = json!({
        "created": task_values(&outcome.created, now)?,
        "errors": serde_json::to_value(&outcome.failures)?,
        "summary": serde_json::to_value(outcome.summary)?,
    });
    Ok(ApiResponse::success(data).with_message(format!(
        "{} of {} tasks created",
        outcome.summary.created, outcome.summary.total
    )))
}

/// Envelope for collection statistics.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn statistics_response(statistics: &TaskStatistics) -> serde_json::Result<ApiResponse> {
    Ok(ApiResponse::success(serde_json::to_value(statistics)?))
}
