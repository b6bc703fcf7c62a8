//! Diesel row models for task and history persistence.

use super::schema::{task_history, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional task description.
    pub description: Option<String>,
    /// Completion flag.
    pub is_completed: bool,
    /// Owning user, if any.
    pub owner_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp, present iff the flag is set.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional task description.
    pub description: Option<String>,
    /// Completion flag.
    pub is_completed: bool,
    /// Owning user, if any.
    pub owner_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp, present iff the flag is set.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Changeset persisting the full mutable state of a task.
///
/// `treat_none_as_null` makes clearing `completed_at` (mark-incomplete)
/// write NULL instead of skipping the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskUpdateRow {
    /// Task title.
    pub title: String,
    /// Optional task description.
    pub description: Option<String>,
    /// Completion flag.
    pub is_completed: bool,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp, present iff the flag is set.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Query result row for audit-history records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Referenced task.
    pub task_id: uuid::Uuid,
    /// Canonical action kind string.
    pub action_type: String,
    /// Free-text change description.
    pub description: String,
    /// Acting user, if any.
    pub user_id: Option<uuid::Uuid>,
    /// Record timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Insert model for audit-history records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_history)]
pub struct NewHistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Referenced task.
    pub task_id: uuid::Uuid,
    /// Canonical action kind string.
    pub action_type: String,
    /// Free-text change description.
    pub description: String,
    /// Acting user, if any.
    pub user_id: Option<uuid::Uuid>,
    /// Record timestamp.
    pub recorded_at: DateTime<Utc>,
}
