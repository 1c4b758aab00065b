//! Error types for the auth module

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur while acquiring an access token
#[derive(Debug, Error)]
pub enum AuthError {
    /// Identity endpoint answered with a non-success status
    #[error("Token request failed with status {status}: {body}")]
    AuthenticationFailed { status: u16, body: String },

    /// The token request never produced a response (timeout, connection error)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Identity endpoint answered 2xx but the body was not a token response
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// HTTP status of the identity endpoint's answer, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::AuthenticationFailed { status, .. } => Some(*status),
            AuthError::Network(e) => e.status().map(|s| s.as_u16()),
            AuthError::InvalidResponse(_) => None,
        }
    }

    /// Response body of a failed token request
    pub fn body(&self) -> Option<&str> {
        match self {
            AuthError::AuthenticationFailed { body, .. } => Some(body),
            _ => None,
        }
    }
}
