//! Tasktrail: task-tracking backend core with an immutable audit trail.
//!
//! This crate implements the task lifecycle and history-logging subsystem
//! of a task-tracking service: validated task mutations, each atomically
//! paired with exactly one append-only history entry, ownership isolation
//! between users, and paginated/windowed queries over the audit log.
//!
//! # Architecture
//!
//! Tasktrail follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, history logging, and statistics
//! - [`api`]: Boundary response envelope consumed by the HTTP layer

pub mod api;
pub mod task;
