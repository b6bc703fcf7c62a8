//! Boundary response envelope produced from core results.
//!
//! The HTTP layer maps service outcomes into this envelope; the core never
//! formats responses itself. Popups accompany successful mutations only,
//! never read-only operations or errors.

use crate::task::{ports::AuthenticationError, services::TaskLifecycleError};
use serde::Serialize;

/// Popup notification code paired with a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Popup {
    /// A task was created.
    TaskCreated,
    /// A task's fields changed.
    TaskUpdated,
    /// A task was deleted.
    TaskDeleted,
    /// A task was marked complete.
    TaskCompleted,
    /// A task was marked incomplete.
    TaskIncomplete,
}

impl Popup {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "TASK_CREATED",
            Self::TaskUpdated => "TASK_UPDATED",
            Self::TaskDeleted => "TASK_DELETED",
            Self::TaskCompleted => "TASK_COMPLETED",
            Self::TaskIncomplete => "TASK_INCOMPLETE",
        }
    }
}

/// Uniform response envelope: `{success, data, error, popup}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload on success, absent on failure.
    pub data: Option<T>,
    /// Error message on failure, absent on success.
    pub error: Option<String>,
    /// Popup code on successful mutations only.
    pub popup: Option<Popup>,
}

impl<T> ApiResponse<T> {
    /// Builds a success envelope without a popup (read-only operations).
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            popup: None,
        }
    }

    /// Builds a success envelope carrying a mutation popup.
    #[must_use]
    pub const fn success_with_popup(data: T, popup: Popup) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            popup: Some(popup),
        }
    }

    /// Builds a failure envelope from an error message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            popup: None,
        }
    }

    /// Builds a failure envelope from a lifecycle error.
    #[must_use]
    pub fn failure(err: &TaskLifecycleError) -> Self {
        Self::error(err.to_string())
    }
}

/// Maps a lifecycle error to the HTTP status code the boundary emits.
///
/// Not-found and ownership-violation deliberately map to distinct codes;
/// conflating them would leak existence information inconsistently.
#[must_use]
pub const fn lifecycle_status(err: &TaskLifecycleError) -> u16 {
    match err {
        TaskLifecycleError::Validation(_) => 422,
        TaskLifecycleError::NotFound(_) => 404,
        TaskLifecycleError::OwnershipViolation(_) => 403,
        TaskLifecycleError::Store(_) => 500,
    }
}

/// Maps an authentication failure to the HTTP status code the boundary
/// emits before the core is invoked.
#[must_use]
pub const fn authentication_status(err: &AuthenticationError) -> u16 {
    match err {
        AuthenticationError::MissingCredential | AuthenticationError::InvalidCredential => 401,
    }
}
