//! Task aggregate root and its validated scalar types.

use super::{TaskDomainError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum title length accepted by the schema.
const TITLE_MAX_CHARS: usize = 255;

/// Maximum description length accepted by the schema.
const DESCRIPTION_MAX_CHARS: usize = 5000;

/// Validated task title: non-empty after trimming, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated title, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the trimmed value is
    /// empty, or [`TaskDomainError::TitleTooLong`] when it exceeds 255
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length > TITLE_MAX_CHARS {
            return Err(TaskDomainError::TitleTooLong(length));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated task description: at most 5000 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DescriptionTooLong`] when the value
    /// exceeds 5000 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let length = raw.chars().count();
        if length > DESCRIPTION_MAX_CHARS {
            return Err(TaskDomainError::DescriptionTooLong(length));
        }
        Ok(Self(raw))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validated field changes for a task update.
///
/// At least one field must be supplied; re-validation of each supplied
/// field happens through [`TaskTitle`] and [`TaskDescription`] construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    title: Option<TaskTitle>,
    description: Option<TaskDescription>,
}

impl TaskChanges {
    /// Creates a change set from optional validated fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NoFieldsToUpdate`] when both fields are
    /// absent.
    pub fn new(
        title: Option<TaskTitle>,
        description: Option<TaskDescription>,
    ) -> Result<Self, TaskDomainError> {
        if title.is_none() && description.is_none() {
            return Err(TaskDomainError::NoFieldsToUpdate);
        }
        Ok(Self { title, description })
    }

    /// Returns the new title, if one was supplied.
    #[must_use]
    pub const fn title(&self) -> Option<&TaskTitle> {
        self.title.as_ref()
    }

    /// Returns the new description, if one was supplied.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }
}

/// Task aggregate root.
///
/// Completion state machine: {incomplete, complete} with both transitions
/// and both self-transitions allowed; `completed_at` is present iff the
/// completion flag is set, enforced here rather than at storage level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    is_completed: bool,
    owner: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<TaskDescription>,
    /// Persisted completion flag.
    pub is_completed: bool,
    /// Persisted owner, absent in single-tenant deployments.
    pub owner: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted completion timestamp, present iff the flag is set.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new incomplete task owned by `owner`.
    #[must_use]
    pub fn new(
        title: TaskTitle,
        description: Option<TaskDescription>,
        owner: Option<UserId>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title,
            description,
            is_completed: false,
            owner,
            created_at: timestamp,
            updated_at: timestamp,
            completed_at: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            is_completed: data.is_completed,
            owner: data.owner,
            created_at: data.created_at,
            updated_at: data.updated_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns whether the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Returns the owning user, absent in single-tenant deployments.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the completion timestamp, present iff the task is complete.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns whether `caller` may act on this task.
    ///
    /// A caller without an owner scope (single-tenant deployment) may act
    /// on any task; otherwise the task's owner must match.
    #[must_use]
    pub fn is_accessible_by(&self, caller: Option<UserId>) -> bool {
        caller.is_none_or(|caller_id| self.owner == Some(caller_id))
    }

    /// Applies a validated change set and returns the human-readable change
    /// summary for the audit trail.
    ///
    /// Only supplied fields mutate; a supplied value identical to the
    /// current one contributes nothing to the summary. The summary joins
    /// `title: '<old>' -> '<new>'` and `description updated` fragments with
    /// `"; "`, and is empty when nothing effectively changed.
    pub fn apply_changes(&mut self, changes: &TaskChanges, clock: &impl Clock) -> String {
        let mut details: Vec<String> = Vec::new();
        if let Some(new_title) = changes.title()
            && *new_title != self.title
        {
            details.push(format!("title: '{}' -> '{new_title}'", self.title));
            self.title = new_title.clone();
        }
        if let Some(new_description) = changes.description()
            && self.description.as_ref() != Some(new_description)
        {
            details.push("description updated".to_owned());
            self.description = Some(new_description.clone());
        }
        self.touch(clock);
        details.join("; ")
    }

    /// Marks the task complete.
    ///
    /// Re-entrant: completing an already-complete task refreshes its
    /// completion timestamp so the audit trail reflects every user action.
    pub fn mark_complete(&mut self, clock: &impl Clock) {
        self.is_completed = true;
        self.completed_at = Some(clock.utc());
        self.touch(clock);
    }

    /// Marks the task incomplete, clearing its completion timestamp.
    pub fn mark_incomplete(&mut self, clock: &impl Clock) {
        self.is_completed = false;
        self.completed_at = None;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
