//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TallyRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        PersistedTaskData, ResultWindow, SortDirection, SortField, Task, TaskFilter, TaskId,
        TaskNote, TaskPriority, TaskSort, TaskStatus, TaskTally, TextSearch,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Bool, Integer, Text, Timestamptz};
use std::ops::Bound;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

type BoxedCondition = Box<dyn BoxableExpression<tasks::table, Pg, SqlType = Bool>>;

const PRIORITY_RANK_SQL: &str = "CASE tasks.priority \
     WHEN 'low' THEN 0 WHEN 'medium' THEN 1 WHEN 'high' THEN 2 ELSE 3 END";
const STATUS_RANK_SQL: &str = "CASE tasks.status \
     WHEN 'pending' THEN 0 WHEN 'in_progress' THEN 1 WHEN 'completed' THEN 2 ELSE 3 END";

const TALLY_SQL: &str = concat!(
    "SELECT COUNT(*) AS total, ",
    "COUNT(*) FILTER (WHERE completed) AS completed, ",
    "COUNT(*) FILTER (WHERE status = 'pending') AS pending, ",
    "COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress, ",
    "COUNT(*) FILTER (WHERE due_date < $1 AND NOT completed) AS overdue ",
    "FROM tasks",
);

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            tracing::debug!(task_id = %task_id, "inserted task row");
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find(
        &self,
        filter: &TaskFilter,
        sort: TaskSort,
        window: ResultWindow,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let owned_filter = filter.clone();
        let offset = clamp_to_i64(window.offset);
        let limit = window.limit.map(clamp_to_i64);

        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed::<Pg>();
            for condition in conditions(&owned_filter) {
                query = query.filter(condition);
            }

            query = match (sort.field, sort.direction) {
                (SortField::CreatedAt, SortDirection::Ascending) => {
                    query.order_by(tasks::created_at.asc())
                }
                (SortField::CreatedAt, SortDirection::Descending) => {
                    query.order_by(tasks::created_at.desc())
                }
                (SortField::UpdatedAt, SortDirection::Ascending) => {
                    query.order_by(tasks::updated_at.asc())
                }
                (SortField::UpdatedAt, SortDirection::Descending) => {
                    query.order_by(tasks::updated_at.desc())
                }
                (SortField::DueDate, SortDirection::Ascending) => {
                    query.order_by(tasks::due_date.asc())
                }
                (SortField::DueDate, SortDirection::Descending) => {
                    query.order_by(tasks::due_date.desc())
                }
                (SortField::CompletedAt, SortDirection::Ascending) => {
                    query.order_by(tasks::completed_at.asc())
                }
                (SortField::CompletedAt, SortDirection::Descending) => {
                    query.order_by(tasks::completed_at.desc())
                }
                (SortField::Priority, SortDirection::Ascending) => {
                    query.order_by(sql::<Integer>(PRIORITY_RANK_SQL).asc())
                }
                (SortField::Priority, SortDirection::Descending) => {
                    query.order_by(sql::<Integer>(PRIORITY_RANK_SQL).desc())
                }
                (SortField::Status, SortDirection::Ascending) => {
                    query.order_by(sql::<Integer>(STATUS_RANK_SQL).asc())
                }
                (SortField::Status, SortDirection::Descending) => {
                    query.order_by(sql::<Integer>(STATUS_RANK_SQL).desc())
                }
                (SortField::Title, SortDirection::Ascending) => query.order_by(tasks::title.asc()),
                (SortField::Title, SortDirection::Descending) => {
                    query.order_by(tasks::title.desc())
                }
                (SortField::Category, SortDirection::Ascending) => {
                    query.order_by(tasks::category.asc())
                }
                (SortField::Category, SortDirection::Descending) => {
                    query.order_by(tasks::category.desc())
                }
                (SortField::Progress, SortDirection::Ascending) => {
                    query.order_by(tasks::progress.asc())
                }
                (SortField::Progress, SortDirection::Descending) => {
                    query.order_by(tasks::progress.desc())
                }
                (SortField::Insertion, _) => query.order_by(tasks::sequence.asc()),
            };
            query = query.then_order_by(tasks::sequence.asc()).offset(offset);
            if let Some(limit) = limit {
                query = query.limit(limit);
            }

            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn count(&self, filter: &TaskFilter) -> TaskRepositoryResult<u64> {
        let owned_filter = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = tasks::table.count().into_boxed::<Pg>();
            for condition in conditions(&owned_filter) {
                query = query.filter(condition);
            }
            let total = query
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(total).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn tally(&self, now: DateTime<Utc>) -> TaskRepositoryResult<TaskTally> {
        self.run_blocking(move |connection| {
            let row = diesel::sql_query(TALLY_SQL)
                .bind::<Timestamptz, _>(now)
                .get_result::<TallyRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            tally_from_row(row)
        })
        .await
    }
}

/// Translates a filter into SQL predicates, one per constrained field.
fn conditions(filter: &TaskFilter) -> Vec<BoxedCondition> {
    let mut predicates: Vec<BoxedCondition> = Vec::new();

    if let Some(completed) = filter.completed {
        predicates.push(Box::new(tasks::completed.eq(completed)));
    }
    if let Some(priority) = filter.priority {
        predicates.push(Box::new(tasks::priority.eq(priority.as_str())));
    }
    if let Some(category) = filter.category.clone() {
        predicates.push(Box::new(tasks::category.eq(category)));
    }
    if let Some(status) = filter.status {
        predicates.push(Box::new(tasks::status.eq(status.as_str())));
    }
    if !filter.tags_any.is_empty() {
        predicates.push(Box::new(tasks::tags.overlaps_with(filter.tags_any.clone())));
    }
    if let Some(window) = filter.due {
        match window.start() {
            Bound::Included(start) => {
                predicates.push(Box::new(tasks::due_date.assume_not_null().ge(start)));
            }
            Bound::Excluded(start) => {
                predicates.push(Box::new(tasks::due_date.assume_not_null().gt(start)));
            }
            Bound::Unbounded => {}
        }
        match window.end() {
            Bound::Included(end) => {
                predicates.push(Box::new(tasks::due_date.assume_not_null().le(end)));
            }
            Bound::Excluded(end) => {
                predicates.push(Box::new(tasks::due_date.assume_not_null().lt(end)));
            }
            Bound::Unbounded => {}
        }
        predicates.push(Box::new(tasks::due_date.is_not_null()));
    }
    if let Some(min) = filter.progress_min {
        predicates.push(Box::new(tasks::progress.ge(i16::from(min))));
    }
    if let Some(max) = filter.progress_max {
        predicates.push(Box::new(tasks::progress.le(i16::from(max))));
    }
    if let Some(search) = filter.text.as_ref() {
        predicates.push(text_condition(search));
    }
    predicates
}

/// OR-combines case-insensitive substring matches over the search scope.
fn text_condition(search: &TextSearch) -> BoxedCondition {
    let pattern = format!("%{}%", escape_like(search.term()));
    let scope = search.scope();
    let mut alternatives: Vec<BoxedCondition> = Vec::new();

    if scope.includes_title() {
        alternatives.push(Box::new(tasks::title.ilike(pattern.clone())));
    }
    if scope.includes_description() {
        alternatives.push(Box::new(tasks::description.ilike(pattern.clone())));
    }
    if scope.includes_category() {
        alternatives.push(Box::new(tasks::category.ilike(pattern.clone())));
    }
    if scope.includes_tags() {
        alternatives.push(Box::new(
            sql::<Bool>("EXISTS (SELECT 1 FROM unnest(tasks.tags) AS tag WHERE tag ILIKE ")
                .bind::<Text, _>(pattern)
                .sql(")"),
        ));
    }

    alternatives
        .into_iter()
        .reduce(|combined, next| Box::new(combined.or(next)))
        .unwrap_or_else(|| Box::new(sql::<Bool>("FALSE")))
}

/// Escapes `LIKE` metacharacters so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Windows past `i64::MAX` select nothing, so clamping keeps them empty.
fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64) -> TaskRepositoryResult<u64> {
    u64::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn tally_from_row(row: TallyRow) -> TaskRepositoryResult<TaskTally> {
    Ok(TaskTally {
        total: to_u64(row.total)?,
        completed: to_u64(row.completed)?,
        pending: to_u64(row.pending)?,
        in_progress: to_u64(row.in_progress)?,
        overdue: to_u64(row.overdue)?,
    })
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let repeat = serde_json::to_value(task.repeat()).map_err(TaskRepositoryError::persistence)?;
    let notes = serde_json::to_value(task.notes()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        completed: task.is_completed(),
        priority: task.priority().as_str().to_owned(),
        category: task.category().to_owned(),
        due_date: task.due_date(),
        tags: task.tags().to_vec(),
        status: task.status().as_str().to_owned(),
        progress: i16::from(task.progress()),
        repeat,
        notes,
        completed_at: task.completed_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    let NewTaskRow {
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
        notes,
        completed_at,
        updated_at,
        ..
    } = to_new_row(task)?;

    Ok(TaskChangeset {
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
        notes,
        completed_at,
        updated_at,
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        completed,
        priority: persisted_priority,
        category,
        due_date,
        tags,
        status: persisted_status,
        progress: persisted_progress,
        repeat: persisted_repeat,
        notes: persisted_notes,
        completed_at,
        created_at,
        updated_at,
    } = row;

    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let progress = u8::try_from(persisted_progress).map_err(TaskRepositoryError::persistence)?;
    let repeat =
        serde_json::from_value(persisted_repeat).map_err(TaskRepositoryError::persistence)?;
    let notes = serde_json::from_value::<Vec<TaskNote>>(persisted_notes)
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
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
        notes,
        completed_at,
        created_at,
        updated_at,
    }))
}
