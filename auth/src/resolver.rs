use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;

use crate::jwt::TokenService;

/// Read-only access to the user store, keyed by email.
#[async_trait]
pub trait UserLookup: Send + Sync + 'static {
    type User: Send;
    type Error: Display + Send;

    /// Find the user whose unique email matches `email`.
    ///
    /// # Returns
    /// Optional user (None if no record matches)
    async fn find_by_email(&self, email: &str) -> Result<Option<Self::User>, Self::Error>;
}

/// Errors raised while resolving a bearer token to a user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Invalid token, missing subject or unknown subject. Deliberately
    /// carries no detail about which check failed.
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// The user store itself failed; not an authentication verdict.
    #[error("User lookup failed: {0}")]
    LookupFailed(String),
}

/// Maps an inbound access token to the user it was issued for.
pub struct AuthResolver<L: UserLookup> {
    token_service: Arc<TokenService>,
    users: Arc<L>,
}

impl<L: UserLookup> AuthResolver<L> {
    pub fn new(token_service: Arc<TokenService>, users: Arc<L>) -> Self {
        Self {
            token_service,
            users,
        }
    }

    /// Verify `token`, read its `sub` claim and load the matching user.
    ///
    /// Every step either advances or rejects; there is no retry and no
    /// partially authenticated outcome.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token invalid or expired, `sub` absent, or no such user
    /// * `LookupFailed` - The user store returned an error
    pub async fn resolve_current_user(&self, token: &str) -> Result<L::User, ResolveError> {
        let claims = self.token_service.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            ResolveError::Unauthenticated
        })?;

        let email = claims.sub.ok_or_else(|| {
            tracing::debug!("Token has no subject claim");
            ResolveError::Unauthenticated
        })?;

        let user = self.users.find_by_email(&email).await.map_err(|e| {
            tracing::error!(error = %e, "User lookup failed during token resolution");
            ResolveError::LookupFailed(e.to_string())
        })?;

        user.ok_or_else(|| {
            tracing::debug!("Token subject does not match any user");
            ResolveError::Unauthenticated
        })
    }
}
