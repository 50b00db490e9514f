//! Read-side service: filtered listings, date windows, search and
//! statistics.

use super::{TaskServiceConfig, TaskServiceResult};
use crate::task::{
    domain::{
        DueWindow, FieldViolation, ResultWindow, SearchScope, SortDirection, SortField, Task,
        TaskFilter, TaskPage, TaskSort, TaskStatistics, TaskValidationError, TextSearch,
        calendar::LocalDateSpan,
        validation,
    },
    ports::TaskRepository,
};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Declarative list query. Every field is optional; the default lists all
/// tasks, newest first, in pages of the configured size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListTasksRequest {
    /// Completion flag.
    pub completed: Option<bool>,
    /// Priority name.
    pub priority: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Status name.
    pub status: Option<String>,
    /// Matches tasks carrying any of these tags.
    pub tags: Vec<String>,
    /// Only tasks due at or before this instant. Also accepted as `dueDate`.
    #[serde(alias = "dueDate")]
    pub due_before: Option<DateTime<Utc>>,
    /// Minimum progress, inclusive.
    pub progress_min: Option<i64>,
    /// Maximum progress, inclusive.
    pub progress_max: Option<i64>,
    /// Case-insensitive term matched against title, description and
    /// category.
    pub search: Option<String>,
    /// Sort field name.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
    /// One-based page number.
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

/// Ordering and size options for single-predicate lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindOptions {
    /// Sort field name.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u64>,
}

impl FindOptions {
    /// Creates options that use the lookup defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders by `field` in `direction`.
    #[must_use]
    pub fn sorted_by(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(direction.into());
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn limited_to(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Extra predicates accepted by the calendar queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarFilter {
    /// Status name.
    pub status: Option<String>,
    /// Priority name.
    pub priority: Option<String>,
    /// Sort field name.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
}

/// Tasks due on one local day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTasks {
    /// The local day queried.
    pub date: NaiveDate,
    /// Matching tasks.
    pub tasks: Vec<Task>,
}

/// Tasks due during one local week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekTasks {
    /// First day of the week.
    pub week_start: NaiveDate,
    /// Last day of the week, inclusive.
    pub week_end: NaiveDate,
    /// Matching tasks.
    pub tasks: Vec<Task>,
}

/// Open tasks due within a look-ahead window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueSoonTasks {
    /// Window length in days.
    pub days: u32,
    /// Matching tasks, earliest due first.
    pub tasks: Vec<Task>,
}

/// Task listing and aggregation service.
#[derive(Clone)]
pub struct TaskQueryService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: TaskServiceConfig,
}

impl<R, C> TaskQueryService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task query service with default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_config(repository, clock, TaskServiceConfig::default())
    }

    /// Creates a new task query service with explicit configuration.
    #[must_use]
    pub const fn with_config(repository: Arc<R>, clock: Arc<C>, config: TaskServiceConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Lists one page of the tasks matching `request`.
    ///
    /// The total count ignores paging, and the page count is
    /// `ceil(total / page size)`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Validation`] for unknown priority or
    /// status names, out-of-range progress bounds, or a page or page size
    /// below one.
    pub async fn list(&self, request: &ListTasksRequest) -> TaskServiceResult<TaskPage> {
        let filter = list_filter(request)?;
        let page = positive(request.page, 1, "page")?;
        let page_size = positive(request.limit, self.config.page_size(), "limit")?;
        let sort = sort_or(
            request.sort_by.as_deref(),
            request.sort_order.as_deref(),
            TaskSort::descending(SortField::CreatedAt),
        );

        let total_count = self.repository.count(&filter).await?;
        let tasks = self
            .repository
            .find(&filter, sort, ResultWindow::page(page, page_size))
            .await?;
        debug!(total_count, page, page_size, "listed tasks");
        Ok(TaskPage::new(tasks, total_count, page, page_size))
    }

    /// Tasks in a category, matched exactly.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Repository`] when the lookup fails.
    pub async fn find_by_category(
        &self,
        category: &str,
        options: &FindOptions,
    ) -> TaskServiceResult<Vec<Task>> {
        self.find_with(TaskFilter::new().category(category), options)
            .await
    }

    /// Tasks with the given priority.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Validation`] listing the valid
    /// priorities when `priority` is not one of them.
    pub async fn find_by_priority(
        &self,
        priority: &str,
        options: &FindOptions,
    ) -> TaskServiceResult<Vec<Task>> {
        let parsed = validation::priority(priority)?;
        self.find_with(TaskFilter::new().priority(parsed), options)
            .await
    }

    /// Tasks with the given status.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Validation`] listing the valid
    /// statuses when `status` is not one of them.
    pub async fn find_by_status(
        &self,
        status: &str,
        options: &FindOptions,
    ) -> TaskServiceResult<Vec<Task>> {
        let parsed = validation::status(status)?;
        self.find_with(TaskFilter::new().status(parsed), options)
            .await
    }

    /// Tasks carrying the given tag.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Repository`] when the lookup fails.
    pub async fn find_by_tag(&self, tag: &str, options: &FindOptions) -> TaskServiceResult<Vec<Task>> {
        self.find_with(TaskFilter::new().any_tag([tag.trim()]), options)
            .await
    }

    /// Open tasks whose due date has passed, earliest first.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Repository`] when the lookup fails.
    pub async fn find_overdue(&self) -> TaskServiceResult<Vec<Task>> {
        let filter = TaskFilter::new()
            .completed(false)
            .due(DueWindow::before(self.clock.utc()));
        let tasks = self
            .repository
            .find(
                &filter,
                TaskSort::ascending(SortField::DueDate),
                ResultWindow::all(),
            )
            .await?;
        Ok(tasks)
    }

    /// Open tasks due between now and `days` days from now, inclusive.
    /// Uses the configured window when `days` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Repository`] when the lookup fails.
    pub async fn find_due_soon(&self, days: Option<u32>) -> TaskServiceResult<DueSoonTasks> {
        let days = days.unwrap_or_else(|| self.config.due_soon_days());
        let now = self.clock.utc();
        let horizon = TimeDelta::try_days(i64::from(days))
            .and_then(|span| now.checked_add_signed(span))
            .ok_or_else(|| FieldViolation::new("days", "days is out of range"))?;
        let filter = TaskFilter::new()
            .completed(false)
            .due(DueWindow::inclusive(now, horizon));
        let tasks = self
            .repository
            .find(
                &filter,
                TaskSort::ascending(SortField::DueDate),
                ResultWindow::all(),
            )
            .await?;
        Ok(DueSoonTasks { days, tasks })
    }

    /// Tasks due during the current local day, highest priority first by
    /// default.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Validation`] for unknown status or
    /// priority names.
    pub async fn find_today(&self, extra: &CalendarFilter) -> TaskServiceResult<DayTasks> {
        let today = LocalDateSpan::day_of(&self.clock.local());
        let tasks = self
            .find_in_span(today, extra, TaskSort::descending(SortField::Priority))
            .await?;
        Ok(DayTasks {
            date: today.first,
            tasks,
        })
    }

    /// Tasks due during the current local week, earliest due first by
    /// default. Weeks begin on the configured first day.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Validation`] for unknown status or
    /// priority names.
    pub async fn find_this_week(&self, extra: &CalendarFilter) -> TaskServiceResult<WeekTasks> {
        let week = LocalDateSpan::week_of(&self.clock.local(), self.config.week_start());
        let tasks = self
            .find_in_span(week, extra, TaskSort::ascending(SortField::DueDate))
            .await?;
        Ok(WeekTasks {
            week_start: week.first,
            week_end: week.last,
            tasks,
        })
    }

    /// Case-insensitive substring search within `scope`, newest first.
    /// Unknown scope names search every field.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Validation`] when `term` is blank.
    pub async fn search(
        &self,
        term: &str,
        scope: &str,
        limit: Option<u64>,
    ) -> TaskServiceResult<Vec<Task>> {
        if term.trim().is_empty() {
            return Err(
                TaskValidationError::single("query", "search term must not be empty").into(),
            );
        }
        let search = TextSearch::new(term, SearchScope::parse(scope));
        let limit = positive(limit, self.config.search_limit(), "limit")?;
        let tasks = self
            .repository
            .find(
                &TaskFilter::new().text(search),
                TaskSort::descending(SortField::CreatedAt),
                ResultWindow::first(limit),
            )
            .await?;
        debug!(term, scope, found = tasks.len(), "searched tasks");
        Ok(tasks)
    }

    /// Collection-wide counts and rates, computed in one aggregate pass.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Repository`] when aggregation fails.
    pub async fn statistics(&self) -> TaskServiceResult<TaskStatistics> {
        let tally = self.repository.tally(self.clock.utc()).await?;
        Ok(tally.into())
    }

    async fn find_with(
        &self,
        filter: TaskFilter,
        options: &FindOptions,
    ) -> TaskServiceResult<Vec<Task>> {
        let sort = sort_or(
            options.sort_by.as_deref(),
            options.sort_order.as_deref(),
            TaskSort::descending(SortField::CreatedAt),
        );
        let limit = positive(options.limit, self.config.find_limit(), "limit")?;
        let tasks = self
            .repository
            .find(&filter, sort, ResultWindow::first(limit))
            .await?;
        Ok(tasks)
    }

    async fn find_in_span(
        &self,
        span: LocalDateSpan,
        extra: &CalendarFilter,
        default_sort: TaskSort,
    ) -> TaskServiceResult<Vec<Task>> {
        let mut filter =
            TaskFilter::new().due(DueWindow::half_open(span.starts_at, span.ends_before));
        if let Some(raw) = extra.status.as_deref() {
            filter = filter.status(validation::status(raw)?);
        }
        if let Some(raw) = extra.priority.as_deref() {
            filter = filter.priority(validation::priority(raw)?);
        }
        let sort = sort_or(
            extra.sort_by.as_deref(),
            extra.sort_order.as_deref(),
            default_sort,
        );
        let tasks = self
            .repository
            .find(&filter, sort, ResultWindow::all())
            .await?;
        Ok(tasks)
    }
}

/// Uses the caller's sort when a field is named, otherwise `default`.
fn sort_or(field: Option<&str>, direction: Option<&str>, default: TaskSort) -> TaskSort {
    match field {
        Some(name) => TaskSort::new(
            SortField::parse(name),
            direction.map_or(default.direction, SortDirection::parse),
        ),
        None => direction.map_or(default, |raw| {
            TaskSort::new(default.field, SortDirection::parse(raw))
        }),
    }
}

fn positive(value: Option<u64>, default: u64, field: &str) -> Result<u64, FieldViolation> {
    match value {
        None => Ok(default),
        Some(0) => Err(FieldViolation::new(field, format!("{field} must be at least 1"))),
        Some(value) => Ok(value),
    }
}

fn progress_bound(value: Option<i64>, field: &str) -> Result<Option<u8>, FieldViolation> {
    value
        .map(|raw| {
            validation::progress(raw).map_err(|_| {
                FieldViolation::new(field, format!("{field} must be between 0 and 100"))
            })
        })
        .transpose()
}

fn list_filter(request: &ListTasksRequest) -> Result<TaskFilter, TaskValidationError> {
    let mut violations = Vec::new();
    let mut filter = TaskFilter::new();

    if let Some(completed) = request.completed {
        filter = filter.completed(completed);
    }
    if let Some(raw) = request.priority.as_deref() {
        match validation::priority(raw) {
            Ok(priority) => filter = filter.priority(priority),
            Err(violation) => violations.push(violation),
        }
    }
    if let Some(raw) = request.status.as_deref() {
        match validation::status(raw) {
            Ok(status) => filter = filter.status(status),
            Err(violation) => violations.push(violation),
        }
    }
    if let Some(category) = request
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
    {
        filter = filter.category(category);
    }
    let tags: Vec<&str> = request
        .tags
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect();
    if !tags.is_empty() {
        filter = filter.any_tag(tags);
    }
    if let Some(before) = request.due_before {
        filter = filter.due(DueWindow::up_to(before));
    }

    let bounds = (
        progress_bound(request.progress_min, "progressMin"),
        progress_bound(request.progress_max, "progressMax"),
    );
    match bounds {
        (Ok(min), Ok(max)) => filter = filter.progress_between(min, max),
        (min, max) => violations.extend(min.err().into_iter().chain(max.err())),
    }

    if let Some(term) = request
        .search
        .as_deref()
        .filter(|term| !term.trim().is_empty())
    {
        filter = filter.text(TextSearch::new(term, SearchScope::Text));
    }

    TaskValidationError::from_violations(violations).map_or(Ok(filter), Err)
}
