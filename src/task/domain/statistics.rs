//! Collection-wide task statistics.

use super::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Raw counts gathered in a single pass over the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskTally {
    /// Every task.
    pub total: u64,
    /// Tasks flagged completed.
    pub completed: u64,
    /// Tasks with status `pending`.
    pub pending: u64,
    /// Tasks with status `in_progress`.
    pub in_progress: u64,
    /// Open tasks whose due date has passed.
    pub overdue: u64,
}

impl TaskTally {
    /// Adds one task to the tally.
    pub fn record(&mut self, task: &Task, now: DateTime<Utc>) {
        self.total += 1;
        self.completed += u64::from(task.is_completed());
        self.pending += u64::from(task.status() == TaskStatus::Pending);
        self.in_progress += u64::from(task.status() == TaskStatus::InProgress);
        self.overdue += u64::from(task.is_overdue(now));
    }

    /// Tallies a collection.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: DateTime<Utc>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut tally, task| {
            tally.record(task, now);
            tally
        })
    }
}

/// Summary statistics with derived rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    /// Every task.
    pub total: u64,
    /// Completed tasks.
    pub completed: u64,
    /// Pending tasks.
    pub pending: u64,
    /// In-progress tasks.
    pub in_progress: u64,
    /// Overdue tasks.
    pub overdue: u64,
    /// Completed share, as a rounded percentage.
    pub completion_rate: u64,
    /// Overdue share, as a rounded percentage.
    pub overdue_rate: u64,
    /// Pending plus in-progress tasks.
    pub active: u64,
}

impl From<TaskTally> for TaskStatistics {
    fn from(tally: TaskTally) -> Self {
        Self {
            total: tally.total,
            completed: tally.completed,
            pending: tally.pending,
            in_progress: tally.in_progress,
            overdue: tally.overdue,
            completion_rate: rounded_percentage(tally.completed, tally.total),
            overdue_rate: rounded_percentage(tally.overdue, tally.total),
            active: tally.pending + tally.in_progress,
        }
    }
}

/// `round(part / total * 100)` with halves rounded up; zero when `total` is
/// zero.
fn rounded_percentage(part: u64, total: u64) -> u64 {
    part.saturating_mul(200)
        .saturating_add(total)
        .checked_div(total.saturating_mul(2))
        .unwrap_or(0)
}
