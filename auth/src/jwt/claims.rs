use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// JWT claims carried by an access token.
///
/// `sub` identifies the user (an email address) and `exp` is the absolute
/// expiry as a Unix timestamp. Anything else lands in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user email)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp), set by the token service on issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for the given subject.
    pub fn for_subject(sub: impl ToString) -> Self {
        Self::new().with_subject(sub)
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Add a custom claim.
    ///
    /// `sub` and `exp` have dedicated fields and are ignored here.
    pub fn with_claim(mut self, key: impl ToString, value: impl Serialize) -> Self {
        let key = key.to_string();
        if key == "sub" || key == "exp" {
            return self;
        }
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key, json_value);
        }
        self
    }

    /// Subject claim, if present.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.is_some_and(|exp| exp < current_timestamp)
    }
}
