//! Service orchestration tests for the task lifecycle and its audit trail.

use std::sync::Arc;
use std::time::Duration;

use crate::task::{
    adapters::memory::{InMemoryTaskStore, StaticIdentityProvider},
    domain::{ActionType, HistoryEntry, TaskDomainError, TaskId, UserId},
    ports::{
        AuthenticationError, HistoryFilter, HistoryStore, IdentityProvider, PageRequest,
        TaskStoreError,
    },
    services::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleService, UpdateTaskRequest},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = TaskLifecycleService<InMemoryTaskStore, DefaultClock>;

#[fixture]
fn harness() -> (TestService, Arc<InMemoryTaskStore>) {
    let store = Arc::new(InMemoryTaskStore::new());
    let service = TaskLifecycleService::new(Arc::clone(&store), Arc::new(DefaultClock));
    (service, store)
}

async fn entries_for(store: &InMemoryTaskStore, task_id: TaskId) -> Vec<HistoryEntry> {
    let page = PageRequest::new(1, 100, None).expect("valid page request");
    let slice = store
        .history_page(HistoryFilter::default().with_task(task_id), page)
        .await
        .expect("history query should succeed");
    slice.entries
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_then_get_returns_incomplete_task_with_one_created_entry(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, store) = harness;
    let created = service
        .create_task(CreateTaskRequest::new("Buy groceries").with_description("milk and bread"))
        .await
        .expect("task creation should succeed");

    let fetched = service
        .get_task(created.id(), None)
        .await
        .expect("lookup should succeed");
    assert!(!fetched.is_completed());
    assert!(fetched.completed_at().is_none());
    assert_eq!(fetched, created);

    let entries = entries_for(&store, created.id()).await;
    assert_eq!(entries.len(), 1);
    let entry = entries.first().expect("one entry");
    assert_eq!(entry.action(), ActionType::Created);
    assert_eq!(entry.description(), "Task created");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_invalid_titles_without_writing_state(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, store) = harness;

    let result = service.create_task(CreateTaskRequest::new("   ")).await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::Validation(TaskDomainError::EmptyTitle))
    ));

    let oversized = "x".repeat(300);
    let oversized_result = service.create_task(CreateTaskRequest::new(oversized)).await;
    assert!(matches!(
        oversized_result,
        Err(TaskLifecycleError::Validation(
            TaskDomainError::TitleTooLong(300)
        ))
    ));

    let page = PageRequest::new(1, 100, None).expect("valid page request");
    let slice = store
        .history_page(HistoryFilter::default(), page)
        .await
        .expect("history query should succeed");
    assert_eq!(slice.total_count, 0);
    assert!(service
        .list_tasks(None)
        .await
        .expect("list should succeed")
        .is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_then_incomplete_restores_state_and_appends_two_entries(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, store) = harness;
    let task = service
        .create_task(CreateTaskRequest::new("Walk the dog"))
        .await
        .expect("task creation should succeed");

    std::thread::sleep(Duration::from_millis(2));
    let completed = service
        .mark_complete(task.id(), None)
        .await
        .expect("mark complete should succeed");
    assert!(completed.is_completed());
    assert!(completed.completed_at().is_some());

    std::thread::sleep(Duration::from_millis(2));
    let restored = service
        .mark_incomplete(task.id(), None)
        .await
        .expect("mark incomplete should succeed");
    assert!(!restored.is_completed());
    assert!(restored.completed_at().is_none());

    // Newest first: INCOMPLETED, COMPLETED, CREATED.
    let actions: Vec<ActionType> = entries_for(&store, task.id())
        .await
        .iter()
        .map(HistoryEntry::action)
        .collect();
    assert_eq!(
        actions,
        vec![
            ActionType::Incompleted,
            ActionType::Completed,
            ActionType::Created
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remarking_complete_appends_an_entry_each_time(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, store) = harness;
    let task = service
        .create_task(CreateTaskRequest::new("Ship release"))
        .await
        .expect("task creation should succeed");

    service
        .mark_complete(task.id(), None)
        .await
        .expect("first completion should succeed");
    service
        .mark_complete(task.id(), None)
        .await
        .expect("second completion should succeed");

    let completions = entries_for(&store, task.id())
        .await
        .iter()
        .filter(|entry| entry.action() == ActionType::Completed)
        .count();
    assert_eq!(completions, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_without_fields_is_rejected_and_writes_nothing(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, store) = harness;
    let task = service
        .create_task(CreateTaskRequest::new("Plan trip"))
        .await
        .expect("task creation should succeed");

    let result = service.update_task(task.id(), UpdateTaskRequest::new()).await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::Validation(
            TaskDomainError::NoFieldsToUpdate
        ))
    ));

    assert_eq!(entries_for(&store, task.id()).await.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_records_a_change_summary(harness: (TestService, Arc<InMemoryTaskStore>)) {
    let (service, store) = harness;
    let task = service
        .create_task(CreateTaskRequest::new("Old title"))
        .await
        .expect("task creation should succeed");

    let updated = service
        .update_task(
            task.id(),
            UpdateTaskRequest::new()
                .with_title("New title")
                .with_description("now with details"),
        )
        .await
        .expect("update should succeed");
    assert_eq!(updated.title().as_str(), "New title");

    let entries = entries_for(&store, task.id()).await;
    let newest = entries.first().expect("update entry");
    assert_eq!(newest.action(), ActionType::Updated);
    assert_eq!(
        newest.description(),
        "title: 'Old title' -> 'New title'; description updated"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_with_identical_values_records_an_empty_summary(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, store) = harness;
    let task = service
        .create_task(CreateTaskRequest::new("Stable title"))
        .await
        .expect("task creation should succeed");

    service
        .update_task(task.id(), UpdateTaskRequest::new().with_title("Stable title"))
        .await
        .expect("update should succeed");

    let entries = entries_for(&store, task.id()).await;
    let newest = entries.first().expect("update entry");
    assert_eq!(newest.action(), ActionType::Updated);
    assert_eq!(newest.description(), "");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_task_but_retains_its_trail(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, store) = harness;
    let task = service
        .create_task(CreateTaskRequest::new("Temporary task"))
        .await
        .expect("task creation should succeed");

    service
        .delete_task(task.id(), None)
        .await
        .expect("delete should succeed");

    let result = service.get_task(task.id(), None).await;
    assert!(matches!(result, Err(TaskLifecycleError::NotFound(id)) if id == task.id()));

    let entries = entries_for(&store, task.id()).await;
    assert_eq!(entries.len(), 2);
    let newest = entries.first().expect("delete entry");
    assert_eq!(newest.action(), ActionType::Deleted);
    assert_eq!(newest.description(), "Task deleted: Temporary task");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_tasks_surface_ownership_violation_not_not_found(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, _) = harness;
    let owner = UserId::new();
    let intruder = UserId::new();
    let task = service
        .create_task(CreateTaskRequest::new("Private task").with_owner(owner))
        .await
        .expect("task creation should succeed");

    let get = service.get_task(task.id(), Some(intruder)).await;
    assert!(matches!(get, Err(TaskLifecycleError::OwnershipViolation(_))));

    let update = service
        .update_task(
            task.id(),
            UpdateTaskRequest::new().with_title("Hijack").with_owner(intruder),
        )
        .await;
    assert!(matches!(
        update,
        Err(TaskLifecycleError::OwnershipViolation(_))
    ));

    let delete = service.delete_task(task.id(), Some(intruder)).await;
    assert!(matches!(
        delete,
        Err(TaskLifecycleError::OwnershipViolation(_))
    ));

    let complete = service.mark_complete(task.id(), Some(intruder)).await;
    assert!(matches!(
        complete,
        Err(TaskLifecycleError::OwnershipViolation(_))
    ));

    let incomplete = service.mark_incomplete(task.id(), Some(intruder)).await;
    assert!(matches!(
        incomplete,
        Err(TaskLifecycleError::OwnershipViolation(_))
    ));

    // A genuinely absent task is still reported as not-found.
    let missing = service.get_task(TaskId::new(), Some(intruder)).await;
    assert!(matches!(missing, Err(TaskLifecycleError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_scoping_filters_listings(harness: (TestService, Arc<InMemoryTaskStore>)) {
    let (service, _) = harness;
    let alice = UserId::new();
    let bob = UserId::new();
    service
        .create_task(CreateTaskRequest::new("Alice task").with_owner(alice))
        .await
        .expect("task creation should succeed");
    service
        .create_task(CreateTaskRequest::new("Bob task").with_owner(bob))
        .await
        .expect("task creation should succeed");

    let alice_tasks = service
        .list_tasks(Some(alice))
        .await
        .expect("list should succeed");
    assert_eq!(alice_tasks.len(), 1);
    assert_eq!(
        alice_tasks.first().map(|t| t.title().as_str()),
        Some("Alice task")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_orders_incomplete_before_complete_newest_first(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, _) = harness;
    let task_a = service
        .create_task(CreateTaskRequest::new("A"))
        .await
        .expect("task creation should succeed");
    std::thread::sleep(Duration::from_millis(2));
    let task_b = service
        .create_task(CreateTaskRequest::new("B"))
        .await
        .expect("task creation should succeed");
    std::thread::sleep(Duration::from_millis(2));
    let task_c = service
        .create_task(CreateTaskRequest::new("C"))
        .await
        .expect("task creation should succeed");

    service
        .mark_complete(task_a.id(), None)
        .await
        .expect("mark complete should succeed");

    let ids: Vec<_> = service
        .list_tasks(None)
        .await
        .expect("list should succeed")
        .iter()
        .map(crate::task::domain::Task::id)
        .collect();
    assert_eq!(ids, vec![task_c.id(), task_b.id(), task_a.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_history_write_leaves_the_task_unmutated(
    harness: (TestService, Arc<InMemoryTaskStore>),
) {
    let (service, store) = harness;
    let task = service
        .create_task(CreateTaskRequest::new("Fragile task"))
        .await
        .expect("task creation should succeed");

    store.set_history_failure(true);
    let result = service.mark_complete(task.id(), None).await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::Store(TaskStoreError::Persistence(_)))
    ));

    let update = service
        .update_task(task.id(), UpdateTaskRequest::new().with_title("Renamed"))
        .await;
    assert!(matches!(update, Err(TaskLifecycleError::Store(_))));
    store.set_history_failure(false);

    let fetched = service
        .get_task(task.id(), None)
        .await
        .expect("lookup should succeed");
    assert!(!fetched.is_completed());
    assert!(fetched.completed_at().is_none());
    assert_eq!(fetched.title().as_str(), "Fragile task");
    assert_eq!(entries_for(&store, task.id()).await.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identity_provider_resolves_registered_credentials() {
    let provider = StaticIdentityProvider::new();
    let user = UserId::new();
    provider.register("token-abc", user);

    let resolved = provider
        .resolve("token-abc")
        .await
        .expect("credential should resolve");
    assert_eq!(resolved, user);

    assert_eq!(
        provider.resolve("unknown").await,
        Err(AuthenticationError::InvalidCredential)
    );
    assert_eq!(
        provider.resolve("").await,
        Err(AuthenticationError::MissingCredential)
    );
}
