//! Service layer orchestrating task mutations with paired audit entries.

use crate::task::{
    domain::{
        ActionType, HistoryEntry, Task, TaskChanges, TaskDescription, TaskDomainError, TaskId,
        TaskTitle, UserId,
    },
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    owner: Option<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            owner: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the owning user (multi-tenant deployments).
    #[must_use]
    pub const fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Request payload for updating a task's title and/or description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    owner: Option<UserId>,
}

impl UpdateTaskRequest {
    /// Creates an empty update request.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            title: None,
            description: None,
            owner: None,
        }
    }

    /// Sets the new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the calling user (multi-tenant deployments).
    #[must_use]
    pub const fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Service-level errors for task lifecycle operations.
///
/// Not-found and ownership-violation are distinct outcomes and are never
/// conflated: the former means the task does not exist, the latter that it
/// exists but belongs to a different user.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed; no state changed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task exists but belongs to a different user.
    #[error("access forbidden: no permission to access task {0}")]
    OwnershipViolation(TaskId),

    /// Store operation failed; any partial writes were rolled back.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every mutation resolves ownership, mutates the aggregate, and hands the
/// new state to the store together with exactly one audit entry; the store
/// applies both as one atomic unit.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a new incomplete task and records its CREATED entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] when the title or
    /// description is rejected, or [`TaskLifecycleError::Store`] when
    /// persistence fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let description = request.description.map(TaskDescription::new).transpose()?;
        let task = Task::new(title, description, request.owner, &*self.clock);
        let entry = HistoryEntry::record(
            task.id(),
            ActionType::Created,
            "Task created",
            request.owner,
            &*self.clock,
        );
        self.store.insert_task(&task, &entry).await?;
        tracing::info!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Lists tasks visible to `owner`, incomplete-first and newest-first
    /// within each completion group.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the read fails.
    pub async fn list_tasks(&self, owner: Option<UserId>) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.store.list_for_owner(owner).await?)
    }

    /// Retrieves a task, enforcing ownership when a caller scope is given.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not
    /// exist, or [`TaskLifecycleError::OwnershipViolation`] when it exists
    /// but belongs to another user.
    pub async fn get_task(&self, id: TaskId, owner: Option<UserId>) -> TaskLifecycleResult<Task> {
        let task = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))?;
        if !task.is_accessible_by(owner) {
            return Err(TaskLifecycleError::OwnershipViolation(id));
        }
        Ok(task)
    }

    /// Updates a task's title and/or description, recording an UPDATED
    /// entry with a human-readable change summary.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] when no field is supplied
    /// or a supplied field is rejected, plus the resolution errors of
    /// [`Self::get_task`].
    pub async fn update_task(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let title = request.title.map(TaskTitle::new).transpose()?;
        let description = request.description.map(TaskDescription::new).transpose()?;
        let changes = TaskChanges::new(title, description)?;

        let mut task = self.get_task(id, request.owner).await?;
        let summary = task.apply_changes(&changes, &*self.clock);
        let entry = HistoryEntry::record(
            id,
            ActionType::Updated,
            summary,
            request.owner,
            &*self.clock,
        );
        self.store.update_task(&task, &entry).await?;
        tracing::debug!(task_id = %id, "task updated");
        Ok(task)
    }

    /// Deletes a task, appending its DELETED entry in the same unit.
    ///
    /// Earlier audit entries are retained after deletion.
    ///
    /// # Errors
    ///
    /// Propagates the resolution errors of [`Self::get_task`] and store
    /// failures.
    pub async fn delete_task(&self, id: TaskId, owner: Option<UserId>) -> TaskLifecycleResult<()> {
        let task = self.get_task(id, owner).await?;
        let entry = HistoryEntry::record(
            id,
            ActionType::Deleted,
            format!("Task deleted: {}", task.title()),
            owner,
            &*self.clock,
        );
        self.store.delete_task(id, &entry).await?;
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Marks a task complete, recording a COMPLETED entry.
    ///
    /// Re-entrant: an already-complete task stays complete, yet the call
    /// still appends an entry so the trail reflects every user action.
    ///
    /// # Errors
    ///
    /// Propagates the resolution errors of [`Self::get_task`] and store
    /// failures.
    pub async fn mark_complete(
        &self,
        id: TaskId,
        owner: Option<UserId>,
    ) -> TaskLifecycleResult<Task> {
        self.set_completion(id, owner, true).await
    }

    /// Marks a task incomplete, recording an INCOMPLETED entry.
    ///
    /// # Errors
    ///
    /// Propagates the resolution errors of [`Self::get_task`] and store
    /// failures.
    pub async fn mark_incomplete(
        &self,
        id: TaskId,
        owner: Option<UserId>,
    ) -> TaskLifecycleResult<Task> {
        self.set_completion(id, owner, false).await
    }

    async fn set_completion(
        &self,
        id: TaskId,
        owner: Option<UserId>,
        completed: bool,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.get_task(id, owner).await?;
        let (action, message) = if completed {
            task.mark_complete(&*self.clock);
            (ActionType::Completed, "Task marked as completed")
        } else {
            task.mark_incomplete(&*self.clock);
            (ActionType::Incompleted, "Task marked as incomplete")
        };
        let entry = HistoryEntry::record(id, action, message, owner, &*self.clock);
        self.store.update_task(&task, &entry).await?;
        tracing::debug!(task_id = %id, action = %action, "task completion changed");
        Ok(task)
    }
}
