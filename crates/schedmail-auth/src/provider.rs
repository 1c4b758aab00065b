//! Client-credentials token provider
//!
//! Fetches app-only tokens from the Microsoft identity platform and caches them
//! until they are about to expire.

use crate::token::{AccessToken, TokenResponse};
use crate::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default Microsoft identity platform host
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope granting the app's configured Graph permissions
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

const TOKEN_TIMEOUT: Duration = Duration::from_secs(15);

/// Credentials for the OAuth2 client-credentials grant
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientCredentials {
    /// Directory (tenant) ID
    pub tenant_id: String,
    /// Application (client) ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Requested scope
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Identity platform host, without trailing path
    #[serde(default = "default_authority")]
    pub authority_url: String,
}

fn default_scope() -> String {
    GRAPH_DEFAULT_SCOPE.to_string()
}

fn default_authority() -> String {
    DEFAULT_AUTHORITY.to_string()
}

impl ClientCredentials {
    /// Credentials for the Graph default scope on the public authority
    pub fn new(tenant_id: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            scope: default_scope(),
            authority_url: default_authority(),
        }
    }

    /// Token endpoint for the configured tenant
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_url.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .field("authority_url", &self.authority_url)
            .finish()
    }
}

/// Hands out bearer tokens, fetching a new one only when the cached token
/// is missing or about to expire.
///
/// The cache lock is held across the fetch, so concurrent callers that find
/// the cache empty share a single token request.
pub struct TokenProvider {
    client: reqwest::Client,
    credentials: ClientCredentials,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(credentials: ClientCredentials) -> Self {
        Self::with_http_client(credentials, reqwest::Client::new())
    }

    /// Use an existing HTTP client (and its connection pool)
    pub fn with_http_client(credentials: ClientCredentials, client: reqwest::Client) -> Self {
        Self {
            client,
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// Get a valid access token, fetching one if needed
    pub async fn access_token(&self) -> AuthResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.secret().to_string());
            }
            debug!("Cached token expired, fetching a new one");
        }

        let token = self.fetch_token().await?;
        let secret = token.secret().to_string();
        *cached = Some(token);
        Ok(secret)
    }

    /// Drop the cached token so the next call fetches a fresh one
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        if cached.take().is_some() {
            debug!("Invalidated cached token");
        }
    }

    async fn fetch_token(&self) -> AuthResult<AccessToken> {
        let url = self.credentials.token_url();
        debug!(
            "Requesting client-credentials token for tenant {}",
            self.credentials.tenant_id
        );

        let response = self
            .client
            .post(&url)
            .timeout(TOKEN_TIMEOUT)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
                ("scope", self.credentials.scope.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::AuthenticationFailed { status, body });
        }

        let body = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        let token = AccessToken::from_response(parsed);
        info!("Acquired access token, expires_at={:?}", token.expires_at());
        Ok(token)
    }
}
