use std::sync::Arc;

use async_trait::async_trait;
use auth::AccessToken;
use auth::AuthResolver;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;
use auth::ResolveError;
use auth::UserLookup;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

const DUMMY_PASSWORD: &str = "lingodrift-dummy-password";

/// Domain service implementation for user authentication.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    resolver: AuthResolver<RepositoryLookup<UR>>,
    /// Verified against when no user matches, so every login pays one hash check.
    dummy_hash: Arc<str>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Configured password hasher and token service
    ///
    /// # Errors
    /// * `Unknown` - Hashing the placeholder password failed
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Result<Self, UserError> {
        let dummy_hash = authenticator
            .hash_password(DUMMY_PASSWORD)
            .map_err(|e| UserError::Unknown(format!("Failed to prepare dummy hash: {}", e)))?;
        let resolver = AuthResolver::new(
            Arc::new(authenticator.token_service().clone()),
            Arc::new(RepositoryLookup(Arc::clone(&repository))),
        );

        Ok(Self {
            repository,
            authenticator,
            resolver,
            dummy_hash: dummy_hash.into(),
        })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, UserError> {
        let user = match EmailAddress::new(email.to_string()) {
            Ok(email) => self.repository.find_by_email(email.as_str()).await?,
            Err(_) => None,
        };

        let user_id = user.as_ref().map(|user| user.id);
        let authenticator = Arc::clone(&self.authenticator);
        let dummy_hash = Arc::clone(&self.dummy_hash);
        let password = password.to_string();

        // Hash verification is CPU-bound; keep it off the async workers.
        let result = tokio::task::spawn_blocking(move || match user {
            Some(user) => {
                let claims = Claims::for_subject(user.email.as_str());
                authenticator.authenticate(&password, &user.password_hash, &claims, None)
            }
            None => {
                authenticator.verify_password(&password, &dummy_hash);
                Err(AuthenticationError::InvalidCredentials)
            }
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?;

        match result {
            Ok(token) => {
                tracing::info!(user_id = ?user_id, "User logged in");
                Ok(token)
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::info!(user_id = ?user_id, "Login rejected");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::TokenError(e)) => Err(UserError::Unknown(format!(
                "Token generation failed: {}",
                e
            ))),
        }
    }

    async fn current_user(&self, token: &str) -> Result<User, UserError> {
        self.resolver
            .resolve_current_user(token)
            .await
            .map_err(|e| match e {
                ResolveError::Unauthenticated => UserError::Unauthenticated,
                ResolveError::LookupFailed(message) => UserError::LookupFailed(message),
            })
    }
}

/// Adapts a `UserRepository` to the resolver's lookup port.
pub struct RepositoryLookup<UR>(Arc<UR>);

#[async_trait]
impl<UR> UserLookup for RepositoryLookup<UR>
where
    UR: UserRepository,
{
    type User = User;
    type Error = UserError;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.0.find_by_email(email).await
    }
}
