//! Read-side port over the append-only audit log.

use crate::task::domain::{ActionType, HistoryEntry, TaskDomainError, TaskId, UserId};
use crate::task::ports::repository::TaskStoreResult;
use async_trait::async_trait;

/// Smallest accepted page size.
const LIMIT_MIN: u32 = 1;

/// Largest accepted page size.
const LIMIT_MAX: u32 = 100;

/// Validated pagination parameters.
///
/// An explicit `offset` takes precedence over `page` for slicing; the
/// reported current page is then derived from the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
    offset: Option<u64>,
}

impl PageRequest {
    /// Creates validated pagination parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPage`] when `page` is zero, or
    /// [`TaskDomainError::InvalidLimit`] when `limit` is outside `[1,100]`.
    pub const fn new(page: u32, limit: u32, offset: Option<u64>) -> Result<Self, TaskDomainError> {
        if page == 0 {
            return Err(TaskDomainError::InvalidPage(page));
        }
        if limit < LIMIT_MIN || limit > LIMIT_MAX {
            return Err(TaskDomainError::InvalidLimit(limit));
        }
        Ok(Self {
            page,
            limit,
            offset,
        })
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the row offset to slice from.
    #[must_use]
    pub fn slice_offset(&self) -> u64 {
        self.offset
            .unwrap_or_else(|| u64::from(self.page - 1) * u64::from(self.limit))
    }

    /// Returns the page number reported back to the caller.
    #[must_use]
    pub fn current_page(&self) -> u64 {
        self.offset.map_or(u64::from(self.page), |offset| {
            offset.div_euclid(u64::from(self.limit)) + 1
        })
    }
}

/// Filter predicates for audit-log queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Restrict to entries for one task.
    pub task_id: Option<TaskId>,
    /// Restrict to one action kind.
    pub action: Option<ActionType>,
    /// Restrict to entries recorded by one user (owner scoping).
    pub acting_user: Option<UserId>,
}

impl HistoryFilter {
    /// Restricts the filter to one task.
    #[must_use]
    pub const fn with_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Restricts the filter to one action kind.
    #[must_use]
    pub const fn with_action(mut self, action: ActionType) -> Self {
        self.action = Some(action);
        self
    }

    /// Scopes the filter to entries recorded by one user.
    #[must_use]
    pub const fn with_acting_user(mut self, user: UserId) -> Self {
        self.acting_user = Some(user);
        self
    }
}

/// One page of audit entries plus the total matching row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySlice {
    /// Entries in the requested slice, newest first.
    pub entries: Vec<HistoryEntry>,
    /// Total rows matching the filter across all pages.
    pub total_count: u64,
}

/// Audit-log query contract.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Returns one page of entries matching `filter`, ordered by record
    /// timestamp descending, along with the total matching count.
    async fn history_page(
        &self,
        filter: HistoryFilter,
        page: PageRequest,
    ) -> TaskStoreResult<HistorySlice>;
}
