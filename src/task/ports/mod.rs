//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod history;
pub mod identity;
pub mod repository;

pub use history::{HistoryFilter, HistorySlice, HistoryStore, PageRequest};
pub use identity::{AuthenticationError, IdentityProvider};
pub use repository::{TaskCounts, TaskStore, TaskStoreError, TaskStoreResult};
