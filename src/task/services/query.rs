//! Read-side service over the audit log and task statistics.

use crate::task::{
    domain::{HistoryEntry, WeekWindow},
    ports::{HistoryFilter, HistoryStore, PageRequest, TaskStore},
    services::lifecycle::TaskLifecycleResult,
};
use chrono::{DateTime, Utc, Weekday};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;

/// Pagination metadata reported alongside a history page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Total rows matching the filter across all pages.
    pub total_count: u64,
    /// Total number of pages at the requested page size.
    pub total_pages: u64,
    /// Page the returned slice corresponds to.
    pub current_page: u64,
    /// Requested page size.
    pub page_size: u32,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

/// One page of audit entries with pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPage {
    /// Entries in the requested slice, newest first.
    pub items: Vec<HistoryEntry>,
    /// Pagination metadata.
    pub pagination: PageInfo,
}

/// Weekly and all-time task statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyStats {
    /// Tasks created within the current week window.
    pub tasks_created_this_week: u64,
    /// Tasks completed within the current week window.
    pub tasks_completed_this_week: u64,
    /// All-time completed task count.
    pub total_completed: u64,
    /// All-time incomplete task count.
    pub total_incomplete: u64,
    /// All-time task count.
    pub total_tasks: u64,
    /// Inclusive window start.
    pub week_start: DateTime<Utc>,
    /// Inclusive window end.
    pub week_end: DateTime<Utc>,
}

/// History pagination and weekly statistics service.
#[derive(Clone)]
pub struct HistoryQueryService<S, H, C>
where
    S: TaskStore,
    H: HistoryStore,
    C: Clock + Send + Sync,
{
    tasks: Arc<S>,
    history: Arc<H>,
    clock: Arc<C>,
    week_start: Weekday,
}

impl<S, H, C> HistoryQueryService<S, H, C>
where
    S: TaskStore,
    H: HistoryStore,
    C: Clock + Send + Sync,
{
    /// Creates a query service with the default Monday week start.
    #[must_use]
    pub const fn new(tasks: Arc<S>, history: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            history,
            clock,
            week_start: Weekday::Mon,
        }
    }

    /// Overrides the statistics week-start convention.
    #[must_use]
    pub const fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    /// Returns one page of audit entries matching `filter`, newest first,
    /// with pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::services::TaskLifecycleError::Store`] when
    /// the underlying query fails.
    pub async fn history_page(
        &self,
        filter: HistoryFilter,
        page: PageRequest,
    ) -> TaskLifecycleResult<HistoryPage> {
        let slice = self.history.history_page(filter, page).await?;
        let total_pages = slice.total_count.div_ceil(u64::from(page.limit()));
        let current_page = page.current_page();
        Ok(HistoryPage {
            items: slice.entries,
            pagination: PageInfo {
                total_count: slice.total_count,
                total_pages,
                current_page,
                page_size: page.limit(),
                has_next: current_page < total_pages,
                has_prev: current_page > 1,
            },
        })
    }

    /// Computes weekly and all-time task statistics for the current week.
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::services::TaskLifecycleError::Store`] when
    /// the underlying counts fail.
    pub async fn weekly_stats(&self) -> TaskLifecycleResult<WeeklyStats> {
        let window = WeekWindow::containing(self.clock.utc(), self.week_start);
        let counts = self.tasks.count_tasks(window).await?;
        Ok(WeeklyStats {
            tasks_created_this_week: counts.created_in_window,
            tasks_completed_this_week: counts.completed_in_window,
            total_completed: counts.total_completed,
            total_incomplete: counts.total_incomplete,
            total_tasks: counts.total_tasks,
            week_start: window.start(),
            week_end: window.end(),
        })
    }
}
