//! Static identity provider for tests and single-node deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::UserId,
    ports::{AuthenticationError, IdentityProvider},
};

/// Identity provider backed by a fixed credential-to-user table.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    credentials: Arc<RwLock<HashMap<String, UserId>>>,
}

impl StaticIdentityProvider {
    /// Creates a provider with no registered credentials.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `credential` as belonging to `user`.
    pub fn register(&self, credential: impl Into<String>, user: UserId) {
        if let Ok(mut table) = self.credentials.write() {
            table.insert(credential.into(), user);
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, credential: &str) -> Result<UserId, AuthenticationError> {
        if credential.is_empty() {
            return Err(AuthenticationError::MissingCredential);
        }
        let table = self
            .credentials
            .read()
            .map_err(|_| AuthenticationError::InvalidCredential)?;
        table
            .get(credential)
            .copied()
            .ok_or(AuthenticationError::InvalidCredential)
    }
}
