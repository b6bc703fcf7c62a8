//! `PostgreSQL` store implementation pairing task writes with audit entries.

use super::{
    models::{HistoryRow, NewHistoryRow, NewTaskRow, TaskRow, TaskUpdateRow},
    schema::{task_history, tasks},
};
use crate::task::{
    domain::{
        ActionType, HistoryEntry, HistoryId, PersistedHistoryData, PersistedTaskData, Task,
        TaskDescription, TaskId, TaskTitle, UserId, WeekWindow,
    },
    ports::{
        HistoryFilter, HistorySlice, HistoryStore, PageRequest, TaskCounts, TaskStore,
        TaskStoreError, TaskStoreResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task and history store.
///
/// Every mutation runs its task write and history append inside one
/// database transaction; a failure on either side rolls back both.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl From<DieselError> for TaskStoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn insert_task(&self, task: &Task, entry: &HistoryEntry) -> TaskStoreResult<()> {
        let task_id = task.id();
        let new_task = to_new_task_row(task);
        let new_entry = to_new_history_row(entry);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|txn| {
                diesel::insert_into(tasks::table)
                    .values(&new_task)
                    .execute(txn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskStoreError::DuplicateTask(task_id)
                        }
                        other => TaskStoreError::persistence(other),
                    })?;
                diesel::insert_into(task_history::table)
                    .values(&new_entry)
                    .execute(txn)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_task(&self, task: &Task, entry: &HistoryEntry) -> TaskStoreResult<()> {
        let task_id = task.id();
        let changeset = to_update_row(task);
        let new_entry = to_new_history_row(entry);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|txn| {
                let affected =
                    diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                        .set(&changeset)
                        .execute(txn)?;
                if affected == 0 {
                    return Err(TaskStoreError::NotFound(task_id));
                }
                diesel::insert_into(task_history::table)
                    .values(&new_entry)
                    .execute(txn)?;
                Ok(())
            })
        })
        .await
    }

    async fn delete_task(&self, id: TaskId, entry: &HistoryEntry) -> TaskStoreResult<()> {
        let new_entry = to_new_history_row(entry);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|txn| {
                // Append the DELETED entry first; a missing task rolls the
                // append back with the rest of the unit.
                diesel::insert_into(task_history::table)
                    .values(&new_entry)
                    .execute(txn)?;
                let affected =
                    diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                        .execute(txn)?;
                if affected == 0 {
                    return Err(TaskStoreError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_for_owner(&self, owner: Option<UserId>) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table.into_boxed();
            if let Some(owner_id) = owner {
                query = query.filter(tasks::owner_id.eq(owner_id.into_inner()));
            }
            let rows = query
                .order((tasks::is_completed.asc(), tasks::created_at.desc()))
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn count_tasks(&self, window: WeekWindow) -> TaskStoreResult<TaskCounts> {
        self.run_blocking(move |connection| {
            let total_tasks = tasks::table.count().get_result::<i64>(connection)?;
            let total_completed = tasks::table
                .filter(tasks::is_completed.eq(true))
                .count()
                .get_result::<i64>(connection)?;
            let total_incomplete = tasks::table
                .filter(tasks::is_completed.eq(false))
                .count()
                .get_result::<i64>(connection)?;
            let created_in_window = tasks::table
                .filter(tasks::created_at.between(window.start(), window.end()))
                .count()
                .get_result::<i64>(connection)?;
            let completed_in_window = tasks::table
                .filter(tasks::completed_at.is_not_null())
                .filter(
                    tasks::completed_at
                        .assume_not_null()
                        .between(window.start(), window.end()),
                )
                .count()
                .get_result::<i64>(connection)?;

            Ok(TaskCounts {
                total_tasks: to_count(total_tasks),
                total_completed: to_count(total_completed),
                total_incomplete: to_count(total_incomplete),
                created_in_window: to_count(created_in_window),
                completed_in_window: to_count(completed_in_window),
            })
        })
        .await
    }
}

#[async_trait]
impl HistoryStore for PostgresTaskStore {
    async fn history_page(
        &self,
        filter: HistoryFilter,
        page: PageRequest,
    ) -> TaskStoreResult<HistorySlice> {
        self.run_blocking(move |connection| {
            let total = filtered_history(filter)
                .count()
                .get_result::<i64>(connection)?;
            let offset = i64::try_from(page.slice_offset()).unwrap_or(i64::MAX);
            let rows = filtered_history(filter)
                .order(task_history::recorded_at.desc())
                .offset(offset)
                .limit(i64::from(page.limit()))
                .load::<HistoryRow>(connection)?;
            let entries = rows
                .into_iter()
                .map(row_to_history)
                .collect::<TaskStoreResult<Vec<_>>>()?;
            Ok(HistorySlice {
                entries,
                total_count: to_count(total),
            })
        })
        .await
    }
}

type BoxedHistoryQuery = task_history::BoxedQuery<'static, diesel::pg::Pg>;

fn filtered_history(filter: HistoryFilter) -> BoxedHistoryQuery {
    let mut query = task_history::table.into_boxed();
    if let Some(task_id) = filter.task_id {
        query = query.filter(task_history::task_id.eq(task_id.into_inner()));
    }
    if let Some(action) = filter.action {
        query = query.filter(task_history::action_type.eq(action.as_str()));
    }
    if let Some(user) = filter.acting_user {
        query = query.filter(task_history::user_id.eq(user.into_inner()));
    }
    query
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

fn to_new_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(|d| d.as_str().to_owned()),
        is_completed: task.is_completed(),
        owner_id: task.owner().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        completed_at: task.completed_at(),
    }
}

fn to_update_row(task: &Task) -> TaskUpdateRow {
    TaskUpdateRow {
        title: task.title().as_str().to_owned(),
        description: task.description().map(|d| d.as_str().to_owned()),
        is_completed: task.is_completed(),
        updated_at: task.updated_at(),
        completed_at: task.completed_at(),
    }
}

fn to_new_history_row(entry: &HistoryEntry) -> NewHistoryRow {
    NewHistoryRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        action_type: entry.action().as_str().to_owned(),
        description: entry.description().to_owned(),
        user_id: entry.acting_user().map(UserId::into_inner),
        recorded_at: entry.recorded_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let title = TaskTitle::new(row.title).map_err(TaskStoreError::persistence)?;
    let description = row
        .description
        .map(TaskDescription::new)
        .transpose()
        .map_err(TaskStoreError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title,
        description,
        is_completed: row.is_completed,
        owner: row.owner_id.map(UserId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
        completed_at: row.completed_at,
    }))
}

fn row_to_history(row: HistoryRow) -> TaskStoreResult<HistoryEntry> {
    let action =
        ActionType::try_from(row.action_type.as_str()).map_err(TaskStoreError::persistence)?;

    Ok(HistoryEntry::from_persisted(PersistedHistoryData {
        id: HistoryId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        action,
        description: row.description,
        acting_user: row.user_id.map(UserId::from_uuid),
        recorded_at: row.recorded_at,
    }))
}
