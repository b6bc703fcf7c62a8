//! Unit and behavioural tests for the task module.

mod lifecycle_tests;
mod stats_tests;
