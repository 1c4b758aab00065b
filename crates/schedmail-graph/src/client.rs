use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::retry::{with_retry, RetryConfig};
use crate::types::{SendMailRequest, SendUpdates};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use schedmail_auth::TokenProvider;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const API_TIMEOUT: Duration = Duration::from_secs(20);

/// Calendar and mail operations on a single mailbox, authenticated as the app.
///
/// Each public operation runs under the client's [`RetryConfig`]. The bearer
/// token is fetched lazily on first use and reused until it nears expiry.
pub struct GraphClient {
    client: reqwest::Client,
    config: GraphConfig,
    tokens: TokenProvider,
    retry: RetryConfig,
}

impl GraphClient {
    pub fn new(config: GraphConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Share an existing HTTP client for token and API requests
    pub fn with_http_client(config: GraphConfig, client: reqwest::Client) -> Self {
        let tokens = TokenProvider::with_http_client(config.credentials(), client.clone());
        Self {
            client,
            config,
            tokens,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Create an event and invite every attendee
    pub async fn create_event<P>(&self, payload: &P) -> GraphResult<Value>
    where
        P: Serialize + ?Sized,
    {
        self.create_event_with(payload, SendUpdates::All).await
    }

    /// Create an event. Returns the created event, or `{}` if Graph sent no body.
    pub async fn create_event_with<P>(
        &self,
        payload: &P,
        send_updates: SendUpdates,
    ) -> GraphResult<Value>
    where
        P: Serialize + ?Sized,
    {
        debug!(
            "Graph: creating event for {} sendUpdates={}",
            self.config.mailbox, send_updates
        );

        let body = self
            .execute(
                Method::POST,
                &["events"],
                &[("sendUpdates", send_updates.as_str())],
                Some(payload),
            )
            .await?;

        let created = match body {
            Some(Value::Null) | None => Value::Object(serde_json::Map::new()),
            Some(value) => value,
        };
        let id = created.get("id").and_then(|v| v.as_str()).unwrap_or("<none>");
        info!("Graph: created event, id={}", id);
        Ok(created)
    }

    /// Apply a partial update to an event and notify every attendee
    pub async fn patch_event<P>(&self, event_id: &str, patch: &P) -> GraphResult<()>
    where
        P: Serialize + ?Sized,
    {
        self.patch_event_with(event_id, patch, SendUpdates::All).await
    }

    pub async fn patch_event_with<P>(
        &self,
        event_id: &str,
        patch: &P,
        send_updates: SendUpdates,
    ) -> GraphResult<()>
    where
        P: Serialize + ?Sized,
    {
        debug!("Graph: patching event {} sendUpdates={}", event_id, send_updates);

        self.execute(
            Method::PATCH,
            &["events", event_id],
            &[("sendUpdates", send_updates.as_str())],
            Some(patch),
        )
        .await?;

        info!("Graph: patched event {}", event_id);
        Ok(())
    }

    /// Send an HTML message from the configured mailbox.
    ///
    /// `attachments` are passed through verbatim and left out of the request
    /// when empty. The sent copy is saved to Sent Items.
    pub async fn send_mail<S: AsRef<str>>(
        &self,
        to: &[S],
        subject: &str,
        html_body: &str,
        attachments: &[Value],
    ) -> GraphResult<()> {
        let request = SendMailRequest::html(to, subject, html_body, attachments);
        debug!(
            "Graph: sending mail from {}, recipients={}, attachments={}",
            self.config.mailbox,
            to.len(),
            attachments.len()
        );

        self.execute(Method::POST, &["sendMail"], &[], Some(&request)).await?;

        info!("Graph: mail sent from {}", self.config.mailbox);
        Ok(())
    }

    /// `{base_url}/users/{mailbox}/{segments...}`
    fn mailbox_url(&self, segments: &[&str]) -> GraphResult<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| GraphError::InvalidUrl(format!("{}: {}", self.config.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| {
                GraphError::InvalidUrl(format!("{}: not a base URL", self.config.base_url))
            })?
            .pop_if_empty()
            .push("users")
            .push(&self.config.mailbox)
            .extend(segments);

        Ok(url)
    }

    /// `request` under the retry policy; only the response body is kept
    async fn execute<B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> GraphResult<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        let (_, body) = with_retry(&self.retry, || {
            self.request(method.clone(), segments, query, body)
        })
        .await?;
        Ok(body)
    }

    /// Single authenticated request. Any non-2xx status is an error.
    async fn request<B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> GraphResult<(u16, Option<Value>)>
    where
        B: Serialize + ?Sized,
    {
        let url = self.mailbox_url(segments)?;
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| GraphError::Serialize(e.to_string()))?;

        let token = self.tokens.access_token().await?;

        let mut builder = self
            .client
            .request(method, url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json")
            .timeout(API_TIMEOUT);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            // A rejected token is dropped so the next attempt fetches a new one
            if status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate().await;
            }
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok((status.as_u16(), None));
        }

        let value = serde_json::from_slice(&bytes).map_err(|e| GraphError::Parse(e.to_string()))?;
        Ok((status.as_u16(), Some(value)))
    }
}
