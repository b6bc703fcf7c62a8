//! Store port pairing task writes with their audit entries.

use crate::task::domain::{HistoryEntry, Task, TaskId, UserId, WeekWindow};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Predicate counts over the task store used by weekly statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// All tasks, regardless of state.
    pub total_tasks: u64,
    /// Tasks currently complete.
    pub total_completed: u64,
    /// Tasks currently incomplete.
    pub total_incomplete: u64,
    /// Tasks whose `created_at` falls inside the window.
    pub created_in_window: u64,
    /// Tasks whose `completed_at` falls inside the window.
    pub completed_in_window: u64,
}

/// Task persistence contract.
///
/// Every mutation method takes the task write together with its audit
/// entry and must apply both as one atomic unit: if either write fails,
/// neither becomes visible.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task together with its CREATED audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the task ID already
    /// exists, or [`TaskStoreError::Persistence`] when either write fails.
    async fn insert_task(&self, task: &Task, entry: &HistoryEntry) -> TaskStoreResult<()>;

    /// Persists the current state of an existing task together with the
    /// audit entry describing the mutation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update_task(&self, task: &Task, entry: &HistoryEntry) -> TaskStoreResult<()>;

    /// Removes a task, appending its DELETED audit entry first within the
    /// same unit. Prior audit entries are retained.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn delete_task(&self, id: TaskId, entry: &HistoryEntry) -> TaskStoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns tasks visible to `owner` (all tasks when no owner scope is
    /// supplied), ordered incomplete-first and newest-created-first within
    /// each completion group.
    async fn list_for_owner(&self, owner: Option<UserId>) -> TaskStoreResult<Vec<Task>>;

    /// Computes the predicate counts backing weekly statistics.
    async fn count_tasks(&self, window: WeekWindow) -> TaskStoreResult<TaskCounts>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure; the whole unit was rolled back.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
