//! Diesel schema for task and audit-history persistence.
//!
//! `task_history.task_id` deliberately carries no foreign key: audit rows
//! are retained after their task is deleted, so the final DELETED entry and
//! the full trail stay queryable.

diesel::table! {
    /// Task records with completion state.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional task description.
        description -> Nullable<Text>,
        /// Completion flag.
        is_completed -> Bool,
        /// Owning user, null in single-tenant deployments.
        owner_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
        /// Completion timestamp, non-null iff the flag is set.
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Append-only audit entries, retained after task deletion.
    task_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Referenced task, not constrained by a foreign key.
        task_id -> Uuid,
        /// Canonical action kind string.
        #[max_length = 20]
        action_type -> Varchar,
        /// Free-text change description.
        description -> Text,
        /// Acting user, null in single-tenant deployments.
        user_id -> Nullable<Uuid>,
        /// Record timestamp.
        recorded_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, task_history);
