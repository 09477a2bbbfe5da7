//! User identity resolution.
//!
//! The user id is resolved once, when a browser session is created, and then
//! carried by that session for every backend call.

use async_trait::async_trait;
use thiserror::Error;

/// Identity lookup failure.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// No identity could be established for the session.
    #[error("no user identity available: {0}")]
    Unavailable(String),
}

/// Source of the user id sent to the backend.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the user id for a new browser session.
    async fn resolve(&self) -> Result<String, IdentityError>;
}

/// Fixed user id taken from configuration.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user_id: String,
}

impl StaticIdentity {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn resolve(&self) -> Result<String, IdentityError> {
        if self.user_id.trim().is_empty() {
            return Err(IdentityError::Unavailable(
                "configured user id is empty".to_string(),
            ));
        }
        Ok(self.user_id.clone())
    }
}
