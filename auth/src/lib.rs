//! Authentication utilities library
//!
//! Credential and token lifecycle for the LingoDrift API:
//! - Password hashing (Argon2id, with verification of legacy bcrypt hashes)
//! - Access token issuance and validation (HS256 JWT)
//! - Resolution of a presented token to a user record
//!
//! Nothing here depends on the web framework; callers thread tokens and
//! user stores in explicitly.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{Claims, TokenService};
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!");
//! let token = tokens.issue(&Claims::for_subject("a@b.com"), None).unwrap();
//! let claims = tokens.verify(token.as_str()).unwrap();
//! assert_eq!(claims.subject(), Some("a@b.com"));
//! ```
//!
//! ## Login Flow
//! ```
//! use auth::{Authenticator, Claims, PasswordHasher, TokenService};
//!
//! let auth = Authenticator::new(
//!     PasswordHasher::new(),
//!     TokenService::new(b"secret_key_at_least_32_bytes_long!"),
//! );
//!
//! let hash = auth.hash_password("password123").unwrap();
//! let token = auth
//!     .authenticate("password123", &hash, &Claims::for_subject("u@x.com"), None)
//!     .unwrap();
//! let claims = auth.validate_token(token.as_str()).unwrap();
//! assert_eq!(claims.subject(), Some("u@x.com"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod resolver;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::AccessToken;
pub use jwt::Claims;
pub use jwt::InvalidToken;
pub use jwt::TokenError;
pub use jwt::TokenService;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use resolver::AuthResolver;
pub use resolver::ResolveError;
pub use resolver::UserLookup;
