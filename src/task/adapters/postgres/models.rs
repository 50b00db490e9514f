//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde_json::Value;

/// Query result row for task records. The insertion sequence only orders
/// queries and is never loaded.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Priority name.
    pub priority: String,
    /// Category.
    pub category: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Status name.
    pub status: String,
    /// Progress percentage.
    pub progress: i16,
    /// Recurrence rule JSON payload.
    pub repeat: Value,
    /// Notes JSON payload.
    pub notes: Value,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records. The sequence is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Priority name.
    pub priority: String,
    /// Category.
    pub category: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Status name.
    pub status: String,
    /// Progress percentage.
    pub progress: i16,
    /// Recurrence rule JSON payload.
    pub repeat: Value,
    /// Notes JSON payload.
    pub notes: Value,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Full-row changeset; cleared optional columns are written as `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Priority name.
    pub priority: String,
    /// Category.
    pub category: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Status name.
    pub status: String,
    /// Progress percentage.
    pub progress: i16,
    /// Recurrence rule JSON payload.
    pub repeat: Value,
    /// Notes JSON payload.
    pub notes: Value,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Single-row result of the statistics aggregate.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct TallyRow {
    /// Every task.
    #[diesel(sql_type = BigInt)]
    pub total: i64,
    /// Completed tasks.
    #[diesel(sql_type = BigInt)]
    pub completed: i64,
    /// Pending tasks.
    #[diesel(sql_type = BigInt)]
    pub pending: i64,
    /// In-progress tasks.
    #[diesel(sql_type = BigInt)]
    pub in_progress: i64,
    /// Overdue tasks.
    #[diesel(sql_type = BigInt)]
    pub overdue: i64,
}
