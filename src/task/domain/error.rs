//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("title: must not be empty")]
    EmptyTitle,

    /// The task title exceeds the persisted column width.
    #[error("title: must be 1-255 characters, got {0}")]
    TitleTooLong(usize),

    /// The task description exceeds the persisted column width.
    #[error("description: must be 0-5000 characters, got {0}")]
    DescriptionTooLong(usize),

    /// An update request carried neither a title nor a description.
    #[error("at least one field (title or description) must be provided")]
    NoFieldsToUpdate,

    /// The requested page number is below one.
    #[error("page must be at least 1, got {0}")]
    InvalidPage(u32),

    /// The requested page size is outside the accepted range.
    #[error("limit must be between 1 and 100, got {0}")]
    InvalidLimit(u32),
}

/// Error returned while parsing history action kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown history action type: {0}")]
pub struct ParseActionTypeError(pub String);
