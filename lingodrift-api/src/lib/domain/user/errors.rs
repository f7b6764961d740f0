use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Authentication outcomes
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthenticated,

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("User lookup failed: {0}")]
    LookupFailed(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
