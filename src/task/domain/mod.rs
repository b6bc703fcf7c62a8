//! Domain model for task lifecycle and audit history.
//!
//! The task domain models validated task creation and mutation, the closed
//! set of auditable actions, and statistics week windows while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod history;
mod ids;
mod task;
mod week;

pub use error::{ParseActionTypeError, TaskDomainError};
pub use history::{ActionType, HistoryEntry, PersistedHistoryData};
pub use ids::{HistoryId, TaskId, UserId};
pub use task::{PersistedTaskData, Task, TaskChanges, TaskDescription, TaskTitle};
pub use week::WeekWindow;
