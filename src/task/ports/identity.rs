//! Identity-provider port resolving bearer credentials to verified users.

use crate::task::domain::UserId;
use async_trait::async_trait;
use thiserror::Error;

/// Errors produced while resolving a caller's identity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    /// No credential was presented.
    #[error("authentication required")]
    MissingCredential,

    /// The presented credential is invalid or expired.
    #[error("invalid credential")]
    InvalidCredential,
}

/// Resolves opaque bearer credentials to verified user identifiers.
///
/// The core never parses credentials itself; failures here are surfaced
/// before any lifecycle operation runs.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves `credential` to a verified user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidCredential`] when the
    /// credential does not map to a known user.
    async fn resolve(&self, credential: &str) -> Result<UserId, AuthenticationError>;
}
