pub mod claims;
pub mod errors;
pub mod service;
pub mod token;

pub use claims::Claims;
pub use errors::InvalidToken;
pub use errors::TokenError;
pub use service::TokenService;
pub use service::DEFAULT_TOKEN_TTL_MINUTES;
pub use token::AccessToken;
