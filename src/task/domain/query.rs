//! Declarative task queries: filters, text search, sorting and windows.
//!
//! A [`TaskFilter`] is a conjunction of optional predicates. Repositories
//! either evaluate it directly through [`TaskFilter::matches`] or translate
//! it into their native query language; both must agree on the semantics
//! documented here.

use super::{Task, TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::ops::{Bound, RangeBounds};

/// Which text fields a search term is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchScope {
    /// Title only.
    Title,
    /// Description only.
    Description,
    /// Category only.
    Category,
    /// Any tag.
    Tags,
    /// Title, description, category or any tag.
    #[default]
    All,
    /// Title, description or category. Used by list queries.
    Text,
}

impl SearchScope {
    /// Parses a caller-supplied scope; unknown names search everything.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "title" => Self::Title,
            "description" => Self::Description,
            "category" => Self::Category,
            "tags" => Self::Tags,
            _ => Self::All,
        }
    }

    /// Returns the wire name of the scope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Tags => "tags",
            Self::All => "all",
            Self::Text => "text",
        }
    }

    /// Whether the title participates in the search.
    #[must_use]
    pub const fn includes_title(self) -> bool {
        matches!(self, Self::Title | Self::All | Self::Text)
    }

    /// Whether the description participates in the search.
    #[must_use]
    pub const fn includes_description(self) -> bool {
        matches!(self, Self::Description | Self::All | Self::Text)
    }

    /// Whether the category participates in the search.
    #[must_use]
    pub const fn includes_category(self) -> bool {
        matches!(self, Self::Category | Self::All | Self::Text)
    }

    /// Whether tags participate in the search.
    #[must_use]
    pub const fn includes_tags(self) -> bool {
        matches!(self, Self::Tags | Self::All)
    }
}

/// Case-insensitive substring search over a set of fields, OR-combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    term: String,
    scope: SearchScope,
}

impl TextSearch {
    /// Creates a search. The term is trimmed but otherwise matched literally.
    #[must_use]
    pub fn new(term: &str, scope: SearchScope) -> Self {
        Self {
            term: term.trim().to_owned(),
            scope,
        }
    }

    /// Returns the search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns the searched fields.
    #[must_use]
    pub const fn scope(&self) -> SearchScope {
        self.scope
    }

    /// Returns `true` when any scoped field contains the term.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let needle = self.term.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
        (self.scope.includes_title() && contains(task.title()))
            || (self.scope.includes_description() && contains(task.description()))
            || (self.scope.includes_category() && contains(task.category()))
            || (self.scope.includes_tags() && task.tags().iter().any(|tag| contains(tag)))
    }
}

/// Bounds on the due date. Tasks without a due date never match a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow {
    start: Bound<DateTime<Utc>>,
    end: Bound<DateTime<Utc>>,
}

impl DueWindow {
    /// Creates a window from explicit bounds.
    #[must_use]
    pub const fn new(start: Bound<DateTime<Utc>>, end: Bound<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Due strictly before `instant`.
    #[must_use]
    pub const fn before(instant: DateTime<Utc>) -> Self {
        Self::new(Bound::Unbounded, Bound::Excluded(instant))
    }

    /// Due at or before `instant`.
    #[must_use]
    pub const fn up_to(instant: DateTime<Utc>) -> Self {
        Self::new(Bound::Unbounded, Bound::Included(instant))
    }

    /// Due in `[start, end]`.
    #[must_use]
    pub const fn inclusive(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(Bound::Included(start), Bound::Included(end))
    }

    /// Due in `[start, end)`.
    #[must_use]
    pub const fn half_open(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(Bound::Included(start), Bound::Excluded(end))
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn start(&self) -> Bound<DateTime<Utc>> {
        self.start
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn end(&self) -> Bound<DateTime<Utc>> {
        self.end
    }

    /// Returns `true` when `instant` lies inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        (self.start, self.end).contains(&instant)
    }
}

/// Conjunction of optional task predicates. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Required completion flag.
    pub completed: Option<bool>,
    /// Required priority.
    pub priority: Option<TaskPriority>,
    /// Required category, matched exactly.
    pub category: Option<String>,
    /// Required status.
    pub status: Option<TaskStatus>,
    /// Matches when the task carries any of these tags. Empty means no
    /// constraint.
    pub tags_any: Vec<String>,
    /// Due-date window.
    pub due: Option<DueWindow>,
    /// Minimum progress, inclusive.
    pub progress_min: Option<u8>,
    /// Maximum progress, inclusive.
    pub progress_max: Option<u8>,
    /// Free-text search.
    pub text: Option<TextSearch>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the given completion flag.
    #[must_use]
    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Requires the given priority.
    #[must_use]
    pub const fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Requires the given category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Requires the given status.
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Requires at least one of the given tags.
    #[must_use]
    pub fn any_tag<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags_any = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Requires the due date to fall in `window`.
    #[must_use]
    pub const fn due(mut self, window: DueWindow) -> Self {
        self.due = Some(window);
        self
    }

    /// Requires progress within `[min, max]`; either side may be open.
    #[must_use]
    pub const fn progress_between(mut self, min: Option<u8>, max: Option<u8>) -> Self {
        self.progress_min = min;
        self.progress_max = max;
        self
    }

    /// Requires a text match.
    #[must_use]
    pub fn text(mut self, search: TextSearch) -> Self {
        self.text = Some(search);
        self
    }

    /// Evaluates the filter against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.completed.is_none_or(|flag| task.is_completed() == flag)
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && self
                .category
                .as_deref()
                .is_none_or(|category| task.category() == category)
            && self.status.is_none_or(|status| task.status() == status)
            && (self.tags_any.is_empty()
                || task.tags().iter().any(|tag| self.tags_any.contains(tag)))
            && self
                .due
                .is_none_or(|window| task.due_date().is_some_and(|due| window.contains(due)))
            && self.progress_min.is_none_or(|min| task.progress() >= min)
            && self.progress_max.is_none_or(|max| task.progress() <= max)
            && self.text.as_ref().is_none_or(|search| search.matches(task))
    }
}

/// Field a result set is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Last modification timestamp.
    UpdatedAt,
    /// Due date; tasks without one sort as if due last.
    DueDate,
    /// Completion timestamp; open tasks sort last.
    CompletedAt,
    /// Priority rank, low to urgent.
    Priority,
    /// Status in workflow order.
    Status,
    /// Title.
    Title,
    /// Category.
    Category,
    /// Progress percentage.
    Progress,
    /// Order in which tasks were stored.
    Insertion,
}

impl SortField {
    /// Parses a caller-supplied field name. Unknown names fall back to
    /// insertion order.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "createdAt" | "created_at" => Self::CreatedAt,
            "updatedAt" | "updated_at" => Self::UpdatedAt,
            "dueDate" | "due_date" => Self::DueDate,
            "completedAt" | "completed_at" => Self::CompletedAt,
            "priority" => Self::Priority,
            "status" => Self::Status,
            "title" => Self::Title,
            "category" => Self::Category,
            "progress" => Self::Progress,
            _ => Self::Insertion,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}

impl SortDirection {
    /// Parses `asc`; anything else sorts descending.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Ordering of a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TaskSort {
    /// Field to order by.
    pub field: SortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl TaskSort {
    /// Creates a sort.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Ascending by `field`.
    #[must_use]
    pub const fn ascending(field: SortField) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    /// Descending by `field`.
    #[must_use]
    pub const fn descending(field: SortField) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Parses caller-supplied field and direction names.
    #[must_use]
    pub fn parse(field: &str, direction: &str) -> Self {
        Self::new(SortField::parse(field), SortDirection::parse(direction))
    }

    /// Compares two tasks by the sort key.
    ///
    /// Returns `Equal` for [`SortField::Insertion`]; repositories break
    /// ties by insertion order themselves.
    #[must_use]
    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => left.created_at().cmp(&right.created_at()),
            SortField::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
            SortField::DueDate => nulls_last(left.due_date(), right.due_date()),
            SortField::CompletedAt => nulls_last(left.completed_at(), right.completed_at()),
            SortField::Priority => left.priority().cmp(&right.priority()),
            SortField::Status => left.status().cmp(&right.status()),
            SortField::Title => left.title().cmp(right.title()),
            SortField::Category => left.category().cmp(right.category()),
            SortField::Progress => left.progress().cmp(&right.progress()),
            SortField::Insertion => Ordering::Equal,
        };
        self.direction.apply(ordering)
    }
}

/// Orders absent values after present ones, matching `PostgreSQL`'s
/// default `NULLS LAST` for ascending sorts.
fn nulls_last<T: Ord>(left: Option<T>, right: Option<T>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Slice of a sorted result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultWindow {
    /// Number of leading results to skip.
    pub offset: u64,
    /// Maximum number of results; `None` returns everything.
    pub limit: Option<u64>,
}

impl ResultWindow {
    /// Every result.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    /// The first `limit` results.
    #[must_use]
    pub const fn first(limit: u64) -> Self {
        Self {
            offset: 0,
            limit: Some(limit),
        }
    }

    /// One-based page `page` of size `page_size`.
    #[must_use]
    pub const fn page(page: u64, page_size: u64) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(page_size),
            limit: Some(page_size),
        }
    }
}

/// One page of a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page.
    pub tasks: Vec<Task>,
    /// Matches across all pages.
    pub total_count: u64,
    /// One-based page number.
    pub page: u64,
    /// Requested page size.
    pub page_size: u64,
    /// `ceil(total_count / page_size)`.
    pub total_pages: u64,
}

impl TaskPage {
    /// Assembles a page, deriving the page count.
    #[must_use]
    pub fn new(tasks: Vec<Task>, total_count: u64, page: u64, page_size: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(page_size)
        };
        Self {
            tasks,
            total_count,
            page,
            page_size,
            total_pages,
        }
    }
}
