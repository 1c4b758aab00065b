//! Microsoft Graph client for creating calendar events and sending mail
//! from a single mailbox, with app-only authentication and blanket retry.

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use client::GraphClient;
pub use config::{GraphConfig, GRAPH_BASE};
pub use error::{ErrorKind, GraphError, GraphResult};
pub use retry::{with_retry, RetryConfig};
pub use types::*;
