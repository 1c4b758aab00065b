//! Authentication module for schedmail
//!
//! Obtains app-only bearer tokens through the OAuth2 client-credentials grant
//! and caches them until shortly before they expire.

mod error;
mod provider;
mod token;

pub use error::{AuthError, AuthResult};
pub use provider::{ClientCredentials, TokenProvider, DEFAULT_AUTHORITY, GRAPH_DEFAULT_SCOPE};
pub use token::AccessToken;
