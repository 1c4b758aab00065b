//! Client configuration

use schedmail_auth::{ClientCredentials, DEFAULT_AUTHORITY, GRAPH_DEFAULT_SCOPE};
use serde::{Deserialize, Serialize};

/// Default Graph API root
pub const GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Credentials and target mailbox for a [`GraphClient`](crate::GraphClient).
///
/// Values are taken as-is; a bad tenant, secret or mailbox only shows up
/// when a call fails.
#[derive(Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Directory (tenant) ID
    pub tenant_id: String,
    /// Application (client) ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Mailbox that owns the events and sends the mail
    pub mailbox: String,
    /// Graph API root
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identity platform host
    #[serde(default = "default_authority_url")]
    pub authority_url: String,
    /// Token scope
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_base_url() -> String {
    GRAPH_BASE.to_string()
}

fn default_authority_url() -> String {
    DEFAULT_AUTHORITY.to_string()
}

fn default_scope() -> String {
    GRAPH_DEFAULT_SCOPE.to_string()
}

impl GraphConfig {
    pub fn new(tenant_id: &str, client_id: &str, client_secret: &str, mailbox: &str) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            mailbox: mailbox.to_string(),
            base_url: default_base_url(),
            authority_url: default_authority_url(),
            scope: default_scope(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_authority_url(mut self, authority_url: &str) -> Self {
        self.authority_url = authority_url.to_string();
        self
    }

    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }

    /// The subset needed by the token provider
    pub fn credentials(&self) -> ClientCredentials {
        ClientCredentials {
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            scope: self.scope.clone(),
            authority_url: self.authority_url.clone(),
        }
    }
}

impl std::fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("mailbox", &self.mailbox)
            .field("base_url", &self.base_url)
            .field("authority_url", &self.authority_url)
            .field("scope", &self.scope)
            .finish()
    }
}
