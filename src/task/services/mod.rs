//! Orchestration services for task lifecycle and audit queries.

pub mod lifecycle;
pub mod query;

pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    UpdateTaskRequest,
};
pub use query::{HistoryPage, HistoryQueryService, PageInfo, WeeklyStats};
