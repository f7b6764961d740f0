use async_trait::async_trait;
use auth::AccessToken;

use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Port for user authentication operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Exchange email and password for an access token.
    ///
    /// # Arguments
    /// * `email` - Login name
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Signed access token whose subject is the user's email
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, UserError>;

    /// Resolve a presented bearer token to the user it was issued for.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token invalid or expired, no subject, or unknown subject
    /// * `LookupFailed` - Database operation failed
    async fn current_user(&self, token: &str) -> Result<User, UserError>;
}

/// Persistence operations for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Arguments
    /// * `email` - Email address string
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
}
