//! In-memory store for task lifecycle and audit-log tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{HistoryEntry, Task, TaskId, UserId, WeekWindow},
    ports::{
        HistoryFilter, HistorySlice, HistoryStore, PageRequest, TaskCounts, TaskStore,
        TaskStoreError, TaskStoreResult,
    },
};

/// Thread-safe in-memory task and history store.
///
/// Mutations are applied under one write lock so the task write and its
/// audit append are observed together, mirroring the transactional
/// contract of the database adapter. History-write failures can be
/// injected to exercise rollback behaviour.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryState>>,
    fail_history_writes: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    tasks: HashMap<TaskId, Task>,
    history: Vec<HistoryEntry>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent history write fail until cleared, leaving
    /// the paired task write unapplied.
    pub fn set_history_failure(&self, fail: bool) {
        self.fail_history_writes.store(fail, Ordering::SeqCst);
    }

    fn write_state(&self) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryState>> {
        self.state.write().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read_state(&self) -> TaskStoreResult<RwLockReadGuard<'_, InMemoryState>> {
        self.state.read().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Fails the unit before any state mutates when injection is active,
    /// simulating a rolled-back transaction.
    fn check_history_write(&self) -> TaskStoreResult<()> {
        if self.fail_history_writes.load(Ordering::SeqCst) {
            return Err(TaskStoreError::persistence(std::io::Error::other(
                "injected history write failure",
            )));
        }
        Ok(())
    }
}

fn count_where<F>(tasks: &HashMap<TaskId, Task>, predicate: F) -> u64
where
    F: Fn(&Task) -> bool,
{
    tasks
        .values()
        .filter(|task| predicate(task))
        .fold(0, |count, _| count + 1)
}

fn visible_to(task: &Task, owner: Option<UserId>) -> bool {
    owner.is_none_or(|owner_id| task.owner() == Some(owner_id))
}

fn matches_filter(entry: &HistoryEntry, filter: HistoryFilter) -> bool {
    filter.task_id.is_none_or(|id| entry.task_id() == id)
        && filter.action.is_none_or(|action| entry.action() == action)
        && filter
            .acting_user
            .is_none_or(|user| entry.acting_user() == Some(user))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert_task(&self, task: &Task, entry: &HistoryEntry) -> TaskStoreResult<()> {
        self.check_history_write()?;
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id()));
        }
        state.history.push(entry.clone());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task, entry: &HistoryEntry) -> TaskStoreResult<()> {
        self.check_history_write()?;
        let mut state = self.write_state()?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::NotFound(task.id()));
        }
        state.history.push(entry.clone());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: TaskId, entry: &HistoryEntry) -> TaskStoreResult<()> {
        self.check_history_write()?;
        let mut state = self.write_state()?;
        if !state.tasks.contains_key(&id) {
            return Err(TaskStoreError::NotFound(id));
        }
        // The DELETED entry is appended before removal; the trail outlives
        // the task.
        state.history.push(entry.clone());
        state.tasks.remove(&id);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_for_owner(&self, owner: Option<UserId>) -> TaskStoreResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| visible_to(task, owner))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.is_completed()
                .cmp(&b.is_completed())
                .then(b.created_at().cmp(&a.created_at()))
        });
        Ok(tasks)
    }

    async fn count_tasks(&self, window: WeekWindow) -> TaskStoreResult<TaskCounts> {
        let state = self.read_state()?;
        Ok(TaskCounts {
            total_tasks: count_where(&state.tasks, |_| true),
            total_completed: count_where(&state.tasks, Task::is_completed),
            total_incomplete: count_where(&state.tasks, |task| !task.is_completed()),
            created_in_window: count_where(&state.tasks, |task| {
                window.contains(task.created_at())
            }),
            completed_in_window: count_where(&state.tasks, |task| {
                task.completed_at().is_some_and(|at| window.contains(at))
            }),
        })
    }
}

#[async_trait]
impl HistoryStore for InMemoryTaskStore {
    async fn history_page(
        &self,
        filter: HistoryFilter,
        page: PageRequest,
    ) -> TaskStoreResult<HistorySlice> {
        let state = self.read_state()?;
        let mut matching: Vec<(usize, &HistoryEntry)> = state
            .history
            .iter()
            .enumerate()
            .filter(|(_, entry)| matches_filter(entry, filter))
            .collect();
        // Newest first; insertion order breaks timestamp ties.
        matching.sort_by(|(a_pos, a), (b_pos, b)| {
            b.recorded_at()
                .cmp(&a.recorded_at())
                .then(b_pos.cmp(a_pos))
        });

        let total_count = matching.iter().fold(0_u64, |count, _| count + 1);
        let offset = usize::try_from(page.slice_offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let entries = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, entry)| entry.clone())
            .collect();
        Ok(HistorySlice {
            entries,
            total_count,
        })
    }
}
