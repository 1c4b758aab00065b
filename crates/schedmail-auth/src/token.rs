//! Access tokens issued by the identity endpoint

use serde::Deserialize;

/// Tokens with less than this many seconds left are refetched
const EXPIRY_MARGIN_SECS: i64 = 300;

/// Body of a successful client-credentials token response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// A bearer token together with its expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    secret: String,
    /// Token expiration timestamp (Unix seconds)
    expires_at: Option<i64>,
}

impl AccessToken {
    /// Create a token that expires `expires_in` seconds from now, or never
    pub fn new(secret: impl Into<String>, expires_in: Option<i64>) -> Self {
        let now = chrono::Utc::now().timestamp();
        let expires_at = expires_in.map(|secs| now.saturating_add(secs));
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    pub(crate) fn from_response(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.expires_in)
    }

    /// The raw bearer token
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// Check if the token is expired or about to expire
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let now = chrono::Utc::now().timestamp();
                expires_at.saturating_sub(now) < EXPIRY_MARGIN_SECS
            }
            None => false,
        }
    }
}
