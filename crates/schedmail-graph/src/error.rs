use schedmail_auth::AuthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("Graph API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Failed to serialize request body: {0}")]
    Serialize(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Coarse failure class, for callers that branch on what went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The identity endpoint refused to issue a token
    Authentication,
    /// A Graph call answered with a non-success status
    ApiRequest,
    /// No response was obtained (timeout, connection error)
    Transport,
    /// Bad configuration or an unreadable response
    Invalid,
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::Authentication(AuthError::Network(_)) => ErrorKind::Transport,
            GraphError::Authentication(_) => ErrorKind::Authentication,
            GraphError::Api { .. } => ErrorKind::ApiRequest,
            GraphError::Transport(_) => ErrorKind::Transport,
            GraphError::Parse(_) | GraphError::Serialize(_) | GraphError::InvalidUrl(_) => {
                ErrorKind::Invalid
            }
        }
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            GraphError::Authentication(e) => e.status(),
            GraphError::Api { status, .. } => Some(*status),
            GraphError::Transport(e) => e.status().map(|s| s.as_u16()),
            GraphError::Parse(_) | GraphError::Serialize(_) | GraphError::InvalidUrl(_) => None,
        }
    }

    /// Body of the failed response, if there was one
    pub fn body(&self) -> Option<&str> {
        match self {
            GraphError::Authentication(e) => e.body(),
            GraphError::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}
