//! Tunable defaults shared by the task services.

use chrono::Weekday;

/// Defaults applied when a caller leaves paging, limits or windows unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskServiceConfig {
    page_size: u64,
    bulk_limit: usize,
    find_limit: u64,
    search_limit: u64,
    due_soon_days: u32,
    week_start: Weekday,
}

impl Default for TaskServiceConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            bulk_limit: 50,
            find_limit: 50,
            search_limit: 20,
            due_soon_days: 3,
            week_start: Weekday::Sun,
        }
    }
}

impl TaskServiceConfig {
    /// Creates a configuration holding the stock defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default list page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the maximum number of drafts accepted by one bulk create.
    #[must_use]
    pub const fn with_bulk_limit(mut self, bulk_limit: usize) -> Self {
        self.bulk_limit = bulk_limit;
        self
    }

    /// Sets the default limit for single-predicate lookups.
    #[must_use]
    pub const fn with_find_limit(mut self, find_limit: u64) -> Self {
        self.find_limit = find_limit;
        self
    }

    /// Sets the default limit for text searches.
    #[must_use]
    pub const fn with_search_limit(mut self, search_limit: u64) -> Self {
        self.search_limit = search_limit;
        self
    }

    /// Sets the default due-soon window.
    #[must_use]
    pub const fn with_due_soon_days(mut self, days: u32) -> Self {
        self.due_soon_days = days;
        self
    }

    /// Sets the first day of the week used by weekly queries.
    #[must_use]
    pub const fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    /// Default list page size.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Maximum bulk-create batch.
    #[must_use]
    pub const fn bulk_limit(&self) -> usize {
        self.bulk_limit
    }

    /// Default lookup limit.
    #[must_use]
    pub const fn find_limit(&self) -> u64 {
        self.find_limit
    }

    /// Default search limit.
    #[must_use]
    pub const fn search_limit(&self) -> u64 {
        self.search_limit
    }

    /// Default due-soon window, in days.
    #[must_use]
    pub const fn due_soon_days(&self) -> u32 {
        self.due_soon_days
    }

    /// First day of the week.
    #[must_use]
    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }
}
