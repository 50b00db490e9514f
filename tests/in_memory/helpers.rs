//! Shared fixtures for in-memory task integration tests.

use crate::test_helpers::PinnedClock;
use rstest::fixture;
use std::sync::Arc;
use taskdeck::task::{
    adapters::memory::InMemoryTaskRepository,
    services::{TaskLifecycleService, TaskQueryService},
};

/// Lifecycle service over the shared repository.
pub type Lifecycle = TaskLifecycleService<InMemoryTaskRepository, PinnedClock>;

/// Query service over the shared repository.
pub type Queries = TaskQueryService<InMemoryTaskRepository, PinnedClock>;

/// Both task services wired to one repository and one clock.
pub struct TaskDeck {
    /// Write side.
    pub lifecycle: Lifecycle,
    /// Read side.
    pub queries: Queries,
    /// Clock shared by both services.
    pub clock: Arc<PinnedClock>,
}

/// Provides services over a fresh repository with the clock at midweek.
#[fixture]
pub fn deck() -> TaskDeck {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(PinnedClock::midweek());
    TaskDeck {
        lifecycle: TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock)),
        queries: TaskQueryService::new(repository, Arc::clone(&clock)),
        clock,
    }
}
