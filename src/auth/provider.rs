use crate::error::AuthError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable provider-side user id
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// Third-party sign-in
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the interactive sign-in flow once. No retry.
    async fn sign_in(&self) -> Result<UserIdentity, AuthError>;
}

/// Used when no `[auth]` section is configured
pub struct UnconfiguredIdentityProvider;

#[async_trait]
impl IdentityProvider for UnconfiguredIdentityProvider {
    async fn sign_in(&self) -> Result<UserIdentity, AuthError> {
        Err(AuthError::NotConfigured)
    }
}
