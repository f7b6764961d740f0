use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid: {0}")]
    InvalidToken(#[from] InvalidToken),
}

/// Reasons a presented token is rejected.
///
/// Every variant is recoverable by re-authenticating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidToken {
    #[error("token is expired")]
    Expired,

    #[error("signature does not match")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}
