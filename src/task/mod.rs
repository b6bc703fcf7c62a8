//! Task lifecycle management and audit history for Tasktrail.
//!
//! This module implements the task-tracking core: creating, updating,
//! completing, and deleting tasks, with every mutation atomically paired
//! with an append-only history entry, ownership isolation between users,
//! paginated history queries, and weekly statistics. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
