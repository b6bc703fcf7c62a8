//! Immutable audit history entries and the closed action enumeration.

use super::{HistoryId, ParseActionTypeError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of auditable action recorded against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Task was created.
    Created,
    /// Task title and/or description changed.
    Updated,
    /// Task was removed.
    Deleted,
    /// Task was marked complete.
    Completed,
    /// Task was marked incomplete.
    Incompleted,
}

impl ActionType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Updated => "UPDATED",
            Self::Deleted => "DELETED",
            Self::Completed => "COMPLETED",
            Self::Incompleted => "INCOMPLETED",
        }
    }
}

impl TryFrom<&str> for ActionType {
    type Error = ParseActionTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "CREATED" => Ok(Self::Created),
            "UPDATED" => Ok(Self::Updated),
            "DELETED" => Ok(Self::Deleted),
            "COMPLETED" => Ok(Self::Completed),
            "INCOMPLETED" => Ok(Self::Incompleted),
            _ => Err(ParseActionTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit record of one action taken on a task.
///
/// Entries are never updated or deleted; they outlive their task so the
/// trail remains queryable after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: HistoryId,
    task_id: TaskId,
    action: ActionType,
    description: String,
    acting_user: Option<UserId>,
    recorded_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted entry identifier.
    pub id: HistoryId,
    /// Persisted task reference.
    pub task_id: TaskId,
    /// Persisted action kind.
    pub action: ActionType,
    /// Persisted change description.
    pub description: String,
    /// Persisted acting user, absent in single-tenant deployments.
    pub acting_user: Option<UserId>,
    /// Persisted record timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates a new entry recording `action` against `task_id`.
    #[must_use]
    pub fn record(
        task_id: TaskId,
        action: ActionType,
        description: impl Into<String>,
        acting_user: Option<UserId>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryId::new(),
            task_id,
            action,
            description: description.into(),
            acting_user,
            recorded_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            action: data.action,
            description: data.description,
            acting_user: data.acting_user,
            recorded_at: data.recorded_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryId {
        self.id
    }

    /// Returns the referenced task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the recorded action kind.
    #[must_use]
    pub const fn action(&self) -> ActionType {
        self.action
    }

    /// Returns the free-text change description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the acting user, absent in single-tenant deployments.
    #[must_use]
    pub const fn acting_user(&self) -> Option<UserId> {
        self.acting_user
    }

    /// Returns the record timestamp.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
