//! Weekly statistics tests with controlled task timestamps.

use std::sync::Arc;

use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{
        ActionType, HistoryEntry, PersistedTaskData, Task, TaskId, TaskTitle, WeekWindow,
    },
    ports::TaskStore,
    services::HistoryQueryService,
};
use chrono::{DateTime, Datelike, TimeDelta, Utc, Weekday};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestQuery = HistoryQueryService<InMemoryTaskStore, InMemoryTaskStore, DefaultClock>;

#[fixture]
fn harness() -> (TestQuery, Arc<InMemoryTaskStore>) {
    let store = Arc::new(InMemoryTaskStore::new());
    let query = HistoryQueryService::new(Arc::clone(&store), Arc::clone(&store), Arc::new(DefaultClock));
    (query, store)
}

fn persisted_task(
    title: &str,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: TaskTitle::new(title).expect("valid title"),
        description: None,
        is_completed: completed_at.is_some(),
        owner: None,
        created_at,
        updated_at: created_at,
        completed_at,
    })
}

async fn insert(store: &InMemoryTaskStore, task: &Task) {
    let entry = HistoryEntry::record(
        task.id(),
        ActionType::Created,
        "Task created",
        None,
        &DefaultClock,
    );
    store
        .insert_task(task, &entry)
        .await
        .expect("insert should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn counts_honour_the_inclusive_week_start_boundary(
    harness: (TestQuery, Arc<InMemoryTaskStore>),
) {
    let (query, store) = harness;
    let window = WeekWindow::containing(Utc::now(), Weekday::Mon);

    let at_start = persisted_task("Created at week start", window.start(), None);
    let before_start = persisted_task(
        "Created just before",
        window.start() - TimeDelta::seconds(1),
        None,
    );
    insert(&store, &at_start).await;
    insert(&store, &before_start).await;

    let stats = query.weekly_stats().await.expect("stats should succeed");
    assert_eq!(stats.tasks_created_this_week, 1);
    assert_eq!(stats.total_tasks, 2);
    assert_eq!(stats.week_start, window.start());
    assert_eq!(stats.week_end, window.end());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_counts_split_weekly_and_all_time(
    harness: (TestQuery, Arc<InMemoryTaskStore>),
) {
    let (query, store) = harness;
    let window = WeekWindow::containing(Utc::now(), Weekday::Mon);

    let open_task = persisted_task("Still open", window.start(), None);
    let done_this_week = persisted_task(
        "Done this week",
        window.start() - TimeDelta::seconds(1),
        Some(window.start()),
    );
    let done_long_ago = persisted_task(
        "Done long ago",
        window.start() - TimeDelta::days(30),
        Some(window.start() - TimeDelta::days(29)),
    );
    insert(&store, &open_task).await;
    insert(&store, &done_this_week).await;
    insert(&store, &done_long_ago).await;

    let stats = query.weekly_stats().await.expect("stats should succeed");
    assert_eq!(stats.tasks_completed_this_week, 1);
    assert_eq!(stats.total_completed, 2);
    assert_eq!(stats.total_incomplete, 1);
    assert_eq!(stats.total_tasks, 3);
    assert_eq!(stats.tasks_created_this_week, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn week_start_convention_is_configurable(harness: (TestQuery, Arc<InMemoryTaskStore>)) {
    let (query, _) = harness;
    let sunday_query = query.with_week_start(Weekday::Sun);

    let stats = sunday_query
        .weekly_stats()
        .await
        .expect("stats should succeed");
    assert_eq!(stats.week_start.weekday(), Weekday::Sun);
}
