use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JwtLibraryError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::InvalidToken;
use super::errors::TokenError;
use super::token::AccessToken;

/// Token lifetime used when neither the caller nor the configuration picks one.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and verifies signed, time-limited access tokens.
///
/// Tokens are standard compact JWS (HS256), so any conforming JWT library
/// holding the same secret can read them.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl: Duration,
}

impl TokenService {
    /// Create a new token service with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (at least 32 bytes for HS256)
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            default_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    /// Override the lifetime applied when `issue` is called without one.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a copy of `claims` with `exp = now + ttl`.
    ///
    /// # Arguments
    /// * `claims` - Caller-supplied claims; any `exp` already present is replaced
    ///   and `sub`/`exp` keys in `extra` are dropped
    /// * `ttl` - Token lifetime, or `None` for the configured default
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry overflowed or signing failed
    pub fn issue(&self, claims: &Claims, ttl: Option<Duration>) -> Result<AccessToken, TokenError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::EncodingFailed("token lifetime overflows".to_string()))?;

        let mut claims = claims.clone();
        claims.extra.remove("sub");
        claims.extra.remove("exp");
        claims.exp = Some(expires_at.timestamp());

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map(AccessToken::new)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Check signature and expiry, returning the full claim set.
    ///
    /// # Errors
    /// * `InvalidToken(Expired)` - `exp` has passed
    /// * `InvalidToken(BadSignature)` - Signed with another secret or tampered with
    /// * `InvalidToken(Malformed)` - Not a decodable HS256 token with an `exp` claim
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_aud = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| TokenError::InvalidToken(classify(e)))
    }
}

fn classify(error: JwtLibraryError) -> InvalidToken {
    match error.kind() {
        ErrorKind::ExpiredSignature => InvalidToken::Expired,
        ErrorKind::InvalidSignature => InvalidToken::BadSignature,
        _ => InvalidToken::Malformed(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::decode_header;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(SECRET);

        let token = service
            .issue(&Claims::for_subject("a@b.com"), None)
            .expect("Failed to issue token");
        let claims = service.verify(token.as_str()).expect("Failed to verify token");

        assert_eq!(claims.subject(), Some("a@b.com"));
        assert!(claims.exp.expect("exp claim missing") > Utc::now().timestamp());
    }

    #[test]
    fn test_default_ttl_applied() {
        let service = TokenService::new(SECRET);
        let before = Utc::now().timestamp();

        let token = service
            .issue(&Claims::for_subject("a@b.com"), None)
            .expect("Failed to issue token");
        let exp = service.verify(token.as_str()).unwrap().exp.unwrap();

        let ttl = DEFAULT_TOKEN_TTL_MINUTES * 60;
        assert!(exp >= before + ttl);
        assert!(exp <= Utc::now().timestamp() + ttl);
    }

    #[test]
    fn test_explicit_ttl_overrides_default() {
        let service = TokenService::new(SECRET).with_default_ttl(Duration::minutes(30));
        let before = Utc::now().timestamp();

        let token = service
            .issue(&Claims::for_subject("a@b.com"), Some(Duration::hours(2)))
            .expect("Failed to issue token");
        let exp = service.verify(token.as_str()).unwrap().exp.unwrap();

        assert!(exp >= before + 2 * 60 * 60);
        assert!(exp <= Utc::now().timestamp() + 2 * 60 * 60);
    }

    #[test]
    fn test_issue_keeps_custom_claims() {
        let service = TokenService::new(SECRET);
        let claims = Claims::for_subject("a@b.com").with_claim("role", "learner");

        let token = service.issue(&claims, None).expect("Failed to issue token");
        let decoded = service.verify(token.as_str()).expect("Failed to verify token");

        assert_eq!(decoded.extra["role"].as_str(), Some("learner"));
    }

    #[test]
    fn test_issue_replaces_existing_exp() {
        let service = TokenService::new(SECRET);
        let mut claims = Claims::for_subject("a@b.com");
        claims.exp = Some(1);

        let token = service.issue(&claims, None).expect("Failed to issue token");
        let decoded = service.verify(token.as_str()).expect("Failed to verify token");

        assert!(decoded.exp.unwrap() > Utc::now().timestamp());
    }

    #[test]
    fn test_issue_drops_reserved_keys_from_extra() {
        let service = TokenService::new(SECRET);
        let mut claims = Claims::for_subject("a@b.com");
        claims
            .extra
            .insert("sub".to_string(), serde_json::json!("mallory@b.com"));

        let token = service.issue(&claims, None).expect("Failed to issue token");
        let decoded = service.verify(token.as_str()).expect("Failed to verify token");

        assert_eq!(decoded.subject(), Some("a@b.com"));
        assert!(decoded.extra.is_empty());
    }

    #[test]
    fn test_header_is_standard_hs256() {
        let service = TokenService::new(SECRET);

        let token = service
            .issue(&Claims::for_subject("a@b.com"), None)
            .expect("Failed to issue token");
        let header = decode_header(token.as_str()).expect("Failed to decode header");

        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(token.as_str().split('.').count(), 3);
    }

    #[test]
    fn test_verify_expired_token() {
        let service = TokenService::new(SECRET);

        let token = service
            .issue(&Claims::for_subject("a@b.com"), Some(Duration::minutes(-5)))
            .expect("Failed to issue token");

        assert_eq!(
            service.verify(token.as_str()),
            Err(TokenError::InvalidToken(InvalidToken::Expired))
        );
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let issuer = TokenService::new(b"secret1_at_least_32_bytes_long_key!");
        let verifier = TokenService::new(b"secret2_at_least_32_bytes_long_key!");

        let token = issuer
            .issue(&Claims::for_subject("a@b.com"), None)
            .expect("Failed to issue token");

        assert_eq!(
            verifier.verify(token.as_str()),
            Err(TokenError::InvalidToken(InvalidToken::BadSignature))
        );
    }

    #[test]
    fn test_verify_malformed_token() {
        let service = TokenService::new(SECRET);

        for token in ["", "invalid.token.here", "not-a-token"] {
            assert!(matches!(
                service.verify(token),
                Err(TokenError::InvalidToken(InvalidToken::Malformed(_)))
            ));
        }
    }

    #[test]
    fn test_verify_token_without_exp() {
        let service = TokenService::new(SECRET);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Claims::for_subject("a@b.com"),
            &EncodingKey::from_secret(SECRET),
        )
        .expect("Failed to encode token");

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::InvalidToken(InvalidToken::Malformed(_)))
        ));
    }

    #[test]
    fn test_verify_rejects_other_algorithm() {
        let service = TokenService::new(SECRET);
        let mut claims = Claims::for_subject("a@b.com");
        claims.exp = Some(Utc::now().timestamp() + 600);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("Failed to encode token");

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::InvalidToken(InvalidToken::Malformed(_)))
        ));
    }
}
