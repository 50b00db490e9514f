//! In-memory task repository for tests and embedded use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{ResultWindow, Task, TaskFilter, TaskId, TaskSort, TaskTally},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, StoredTask>,
    next_sequence: u64,
}

/// A task plus the sequence number recording when it was first stored.
#[derive(Debug)]
struct StoredTask {
    sequence: u64,
    task: Task,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Returns matching tasks ordered by `sort`, ties broken by insertion order.
fn sorted_matches<'a>(
    state: &'a InMemoryTaskState,
    filter: &TaskFilter,
    sort: TaskSort,
) -> Vec<&'a StoredTask> {
    let mut matches: Vec<&StoredTask> = state
        .tasks
        .values()
        .filter(|stored| filter.matches(&stored.task))
        .collect();
    matches.sort_by(|left, right| {
        sort.compare(&left.task, &right.task)
            .then_with(|| left.sequence.cmp(&right.sequence))
    });
    matches
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.tasks.insert(
            task.id(),
            StoredTask {
                sequence,
                task: task.clone(),
            },
        );
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        stored.task = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).map(|stored| stored.task.clone()))
    }

    async fn find(
        &self,
        filter: &TaskFilter,
        sort: TaskSort,
        window: ResultWindow,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let limit = window.limit.map_or(usize::MAX, to_usize);
        Ok(sorted_matches(&state, filter, sort)
            .into_iter()
            .skip(to_usize(window.offset))
            .take(limit)
            .map(|stored| stored.task.clone())
            .collect())
    }

    async fn count(&self, filter: &TaskFilter) -> TaskRepositoryResult<u64> {
        let state = self.read()?;
        let matching = state
            .tasks
            .values()
            .filter(|stored| filter.matches(&stored.task))
            .count();
        Ok(u64::try_from(matching).unwrap_or(u64::MAX))
    }

    async fn tally(&self, now: DateTime<Utc>) -> TaskRepositoryResult<TaskTally> {
        let state = self.read()?;
        Ok(TaskTally::from_tasks(
            state.tasks.values().map(|stored| &stored.task),
            now,
        ))
    }
}
